use serde::{Deserialize, Serialize};

/// A registered account. Passwords are stored and compared as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password: String,
}

/// Body of `POST /user` and `POST /login`
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body of `PATCH /changepassword/:id`
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordChange {
    pub password: String,
}

impl Credentials {
    /// The user row this signup would create once the store assigns `id`.
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            email: self.email,
            password: self.password,
        }
    }
}
