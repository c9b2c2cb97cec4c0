use std::fmt;

pub type UserUid = String;
pub type FcmToken = String;

/// A user record that currently has a push token stored.
#[derive(Clone, PartialEq, Eq)]
pub struct UserToken {
    pub user_uid: UserUid,
    pub fcm_token: FcmToken,
}

impl fmt::Debug for UserToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Intentionally avoid printing fcm_token for security reasons
        write!(f, "UserToken {{ user_uid: {}, fcm_token: *** }}", self.user_uid)
    }
}

#[test]
fn debug_hides_token() {
    let user = UserToken {
        user_uid: "u1".to_string(),
        fcm_token: "secret-token".to_string(),
    };
    let printed = format!("{:?}", user);
    assert!(printed.contains("u1"));
    assert!(!printed.contains("secret-token"));
}
