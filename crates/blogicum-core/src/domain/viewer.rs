use uuid::Uuid;

/// The identity a request executes on behalf of.
///
/// Passed explicitly into every query and authorization call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Viewer {
    #[default]
    Anonymous,
    Authenticated { id: Uuid, username: String },
}

impl Viewer {
    pub fn authenticated(id: Uuid, username: impl Into<String>) -> Self {
        Self::Authenticated {
            id,
            username: username.into(),
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { id, .. } => Some(*id),
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { username, .. } => Some(username),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// True when this viewer is the given user.
    pub fn is(&self, user_id: Uuid) -> bool {
        self.user_id() == Some(user_id)
    }
}
