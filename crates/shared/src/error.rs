use thiserror::Error;

/// A participant string outside the two recognized identities.
#[derive(Debug, Clone, Error)]
#[error("unknown participant '{input}': expected 'vini' or 'duda'")]
pub struct ParseParticipantError {
    pub input: String,
}

#[derive(Debug, Clone, Error)]
#[error("unknown group '{input}': expected 'churrasco' or 'sobremesas'")]
pub struct ParseGroupError {
    pub input: String,
}
