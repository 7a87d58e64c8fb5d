//! Shorthand constructors for script documents.

use botrunner::{
    Assertion,
    Response,
    ScriptDocument,
    Step,
    TestScript,
    script::ScriptConfig,
};

/// User id used by [`document`].
pub const USER_ID: &str = "user-1";
/// Bot token used by [`document`].
pub const BOT_TOKEN: &str = "token-1";

/// A document for the fixed test identity.
pub fn document(tests: impl IntoIterator<Item = TestScript>) -> ScriptDocument {
    ScriptDocument {
        config: ScriptConfig {
            user_id: USER_ID.to_owned(),
            bot_token: BOT_TOKEN.to_owned(),
        },
        tests: tests.into_iter().collect(),
    }
}

/// A named test.
pub fn test(name: &str, steps: impl IntoIterator<Item = Step>) -> TestScript {
    TestScript {
        name: name.to_owned(),
        steps: steps.into_iter().collect(),
    }
}

/// A step with the given assertions and response.
pub fn step(asserts: impl IntoIterator<Item = Assertion>, response: Response) -> Step {
    Step {
        asserts: asserts.into_iter().collect(),
        response,
    }
}
