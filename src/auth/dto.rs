use serde::{Deserialize, Serialize};
use crate::core::library::{LibraryError, LibraryResult};
use crate::utils::wire::{id, non_blank};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    pub fn validate(&self) -> LibraryResult<()> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(LibraryError::validation("Email et mot de passe requis", Some("credentials".to_string())));
        }
        Ok(())
    }
}

// Registration form; the confirmation never leaves this crate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Registration {
    pub telephone: String,
    pub prenom: String,
    pub nom: String,
    pub biblio_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDto {
    pub telephone: String,
    pub prenom: String,
    pub nom: String,
    pub biblio_name: String,
    pub email: String,
    pub password: String,
}

fn is_email(value: &str) -> bool {
    match value.trim().split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

impl Registration {
    pub fn validate(&self) -> LibraryResult<()> {
        let checks = [
            (self.telephone.chars().count() >= 8, "telephone", "Le numéro de téléphone doit contenir au moins 8 caractères"),
            (self.prenom.chars().count() >= 2, "prenom", "Le prénom doit contenir au moins 2 caractères"),
            (self.nom.chars().count() >= 2, "nom", "Le nom doit contenir au moins 2 caractères"),
            (self.biblio_name.chars().count() >= 2, "biblioName", "Le nom de la bibliothèque doit contenir au moins 2 caractères"),
            (is_email(self.email.as_str()), "email", "Email invalide"),
            (self.password.chars().count() >= 8, "password", "Le mot de passe doit contenir au moins 8 caractères"),
            (self.password == self.confirm_password, "confirmPassword", "Les mots de passe ne correspondent pas"),
        ];
        let failed: Vec<(&str, &str)> = checks.iter()
            .filter(|(ok, _, _)| !ok)
            .map(|(_, field, message)| (*field, *message))
            .collect();
        match failed.first() {
            None => Ok(()),
            Some((field, _)) => {
                let messages: Vec<&str> = failed.iter().map(|(_, m)| *m).collect();
                Err(LibraryError::validation(messages.join("; ").as_str(), Some(field.to_string())))
            }
        }
    }

    pub fn to_wire(&self) -> RegistrationDto {
        RegistrationDto {
            telephone: self.telephone.trim().to_string(),
            prenom: self.prenom.trim().to_string(),
            nom: self.nom.trim().to_string(),
            biblio_name: self.biblio_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(with = "id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: Option<String>,
    pub prenom: Option<String>,
    pub nom: Option<String>,
    pub name: Option<String>,
    pub telephone: Option<String>,
    pub biblio_name: Option<String>,
    pub role: Option<String>,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        // first and last name only count together
        if let (Some(prenom), Some(nom)) = (non_blank(self.prenom.clone()), non_blank(self.nom.clone())) {
            return format!("{} {}", prenom, nom);
        }
        if let Some(name) = non_blank(self.name.clone()) {
            return name;
        }
        self.email.as_deref()
            .and_then(|e| e.split('@').next())
            .map(str::trim)
            .filter(|local| !local.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| "utilisateur".to_string())
    }
}

impl From<&RegistrationDto> for UserProfile {
    fn from(other: &RegistrationDto) -> Self {
        Self {
            id: None,
            email: Some(other.email.to_string()),
            prenom: Some(other.prenom.to_string()),
            nom: Some(other.nom.to_string()),
            name: None,
            telephone: Some(other.telephone.to_string()),
            biblio_name: Some(other.biblio_name.to_string()),
            role: None,
        }
    }
}

// Login answer: the profile fields sit next to the token.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: Option<String>,
    #[serde(with = "id")]
    pub id: Option<String>,
    pub email: Option<String>,
    pub prenom: Option<String>,
    pub nom: Option<String>,
    pub telephone: Option<String>,
    pub biblio_name: Option<String>,
    pub role: Option<String>,
    pub message: Option<String>,
}

impl LoginResponse {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            email: self.email.clone(),
            prenom: self.prenom.clone(),
            nom: self.nom.clone(),
            name: None,
            telephone: self.telephone.clone(),
            biblio_name: self.biblio_name.clone(),
            role: self.role.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::dto::{Credentials, LoginResponse, Registration, UserProfile};
    use crate::core::library::LibraryError;

    fn registration() -> Registration {
        Registration {
            telephone: "0611223344".to_string(),
            prenom: "Alice".to_string(),
            nom: "Martin".to_string(),
            biblio_name: "Médiathèque".to_string(),
            email: "alice@example.org".to_string(),
            password: "secret123".to_string(),
            confirm_password: "secret123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_should_accept_valid_registration() {
        assert!(registration().validate().is_ok());
        let json = serde_json::to_value(registration().to_wire()).unwrap();
        assert_eq!("Médiathèque", json["biblioName"]);
        assert!(json.get("confirmPassword").is_none());
    }

    #[tokio::test]
    async fn test_should_reject_bad_registration() {
        let mut reg = registration();
        reg.confirm_password = "other".to_string();
        match reg.validate() {
            Err(LibraryError::Validation { reason_code, .. }) => assert_eq!(Some("confirmPassword".to_string()), reason_code),
            other => panic!("unexpected {:?}", other),
        }

        let mut reg = registration();
        reg.email = "alice.example.org".to_string();
        reg.prenom = "A".to_string();
        match reg.validate() {
            Err(LibraryError::Validation { message, reason_code }) => {
                assert_eq!(Some("prenom".to_string()), reason_code);
                assert!(message.contains("Email invalide"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_should_require_credentials() {
        assert!(Credentials::new("a@b.c", "pw").validate().is_ok());
        assert!(matches!(Credentials::new(" ", "pw").validate(), Err(LibraryError::Validation { .. })));
        assert!(matches!(Credentials::new("a@b.c", "").validate(), Err(LibraryError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_should_build_display_name() {
        let mut profile = UserProfile::default();
        assert_eq!("utilisateur", profile.display_name());
        profile.email = Some("jdupont@example.org".to_string());
        assert_eq!("jdupont", profile.display_name());
        profile.name = Some("Jean D.".to_string());
        assert_eq!("Jean D.", profile.display_name());
        profile.prenom = Some("Jean".to_string());
        assert_eq!("Jean D.", profile.display_name());
        profile.nom = Some("Dupont".to_string());
        assert_eq!("Jean Dupont", profile.display_name());
    }

    #[tokio::test]
    async fn test_should_parse_login_response() {
        let res: LoginResponse = serde_json::from_str(
            r#"{"token": "abc", "id": 4, "prenom": "Jean", "nom": "Dupont", "role": "ADMIN"}"#).unwrap();
        assert_eq!(Some("abc".to_string()), res.token);
        let profile = res.profile();
        assert_eq!(Some("4".to_string()), profile.id);
        assert_eq!("Jean Dupont", profile.display_name());
    }
}
