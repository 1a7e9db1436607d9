use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum UserRole {
    #[default]
    User = 0,
    Moderator = 1,
    Admin = 2,
}

impl UserRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            User => "user",
            Moderator => "moderator",
            Admin => "admin",
        }
    }

    #[inline]
    pub const fn is_moderator_or_higher(&self) -> bool {
        use UserRole::*;
        matches!(self, Moderator | Admin)
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Restore from the stored role id; unknown ids fall back to `User`
    #[inline]
    pub fn from_id(id: i16) -> Self {
        use UserRole::*;
        match id {
            1 => Moderator,
            2 => Admin,
            _ => User,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        for role in [UserRole::User, UserRole::Moderator, UserRole::Admin] {
            assert_eq!(UserRole::from_id(role.id()), role);
        }
        assert_eq!(UserRole::from_id(99), UserRole::User);
    }

    #[test]
    fn test_hierarchy() {
        assert!(!UserRole::User.is_moderator_or_higher());
        assert!(UserRole::Moderator.is_moderator_or_higher());
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Moderator.is_admin());
    }
}
