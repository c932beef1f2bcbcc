use crate::STUB_UUID;

use uuid::Uuid;

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct ScriptId(pub Uuid);

impl ScriptId {
    pub fn stub() -> ScriptId {
        ScriptId(STUB_UUID)
    }
}

/// Optional sub-section of a script that a comment thread can be scoped to
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CodeBlockId(pub Uuid);

impl CodeBlockId {
    pub fn stub() -> CodeBlockId {
        CodeBlockId(STUB_UUID)
    }
}
