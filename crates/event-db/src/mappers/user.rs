//! User model -> entity mapper

use event_core::entities::User;
use event_core::value_objects::UserId;

use crate::models::UserModel;

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: UserId::new(model.id),
            login: model.login,
            email: model.email,
            created_at: model.created_at,
        }
    }
}
