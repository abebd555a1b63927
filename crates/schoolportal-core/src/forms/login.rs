use crate::auth::Credentials;
use crate::models::Role;

use super::{required, Field, ValidationErrors};

/// Login screen state: what the user has typed so far.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub role: Option<Role>,
}

impl LoginForm {
    pub fn validate(&self) -> Result<Credentials, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let username = required(&self.username);
        if username.is_none() {
            errors.add(Field::Username, "Username is required");
        }
        // Passwords are not trimmed, only checked for presence.
        if self.password.trim().is_empty() {
            errors.add(Field::Password, "Password is required");
        }
        if self.role.is_none() {
            errors.add(Field::Role, "User type is required");
        }

        match (username, self.role) {
            (Some(username), Some(role)) if errors.is_empty() => Ok(Credentials {
                username,
                password: self.password.clone(),
                role,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_login_form() {
        let form = LoginForm {
            username: " admin1 ".to_string(),
            password: "x".to_string(),
            role: Some(Role::Admin),
        };
        let creds = form.validate().unwrap();
        assert_eq!(creds.username, "admin1");
        assert_eq!(creds.password, "x");
        assert_eq!(creds.role, Role::Admin);
    }

    #[test]
    fn test_empty_login_form_reports_every_field() {
        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(errors.get(Field::Username), Some("Username is required"));
        assert_eq!(errors.get(Field::Password), Some("Password is required"));
        assert_eq!(errors.get(Field::Role), Some("User type is required"));
    }

    #[test]
    fn test_password_is_not_trimmed() {
        let form = LoginForm {
            username: "s1".to_string(),
            password: " pass ".to_string(),
            role: Some(Role::Student),
        };
        assert_eq!(form.validate().unwrap().password, " pass ");
    }
}
