//! Platform account generation with roles and verification.

use std::collections::HashSet;

use autotrack_models::{NewUser, RecordError, Role, RowId, User};
use fake::{
    Fake,
    faker::{
        internet::en::Password,
        name::en::{FirstName, LastName},
    },
};
use rand::Rng;

use super::{GenerateError, patronymic, pick, require_config};
use crate::documents::DocumentRegistry;

/// Configuration for user generation.
#[derive(Debug, Clone)]
pub struct UserGenConfig {
    /// Distribution of roles (user, operator, admin).
    pub role_distribution: [f64; 3],
    /// Probability that a plain user has passed passport verification.
    pub verification_rate: f64,
    /// Probability that a patronymic (derived from a random given name) is filled in.
    pub lastname_rate: f64,
    /// Mail domains for generated logins.
    pub domains: Vec<String>,
}

impl Default for UserGenConfig {
    fn default() -> Self {
        Self {
            role_distribution: [0.80, 0.15, 0.05],
            verification_rate: 0.8,
            lastname_rate: 0.7,
            domains: [
                "gmail.com",
                "yahoo.com",
                "outlook.com",
                "hotmail.com",
                "protonmail.com",
                "icloud.com",
                "mail.com",
                "zoho.com",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Generates platform accounts.
pub struct UserGenerator {
    config: UserGenConfig,
}

impl UserGenerator {
    /// Creates a new user generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: UserGenConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: UserGenConfig) -> Self {
        Self { config }
    }

    /// Generates a single user.
    ///
    /// Operators and admins are always verified; verified accounts get a
    /// passport minted from `passports`.
    pub fn generate(
        &self,
        id: RowId,
        passports: &mut DocumentRegistry,
        rng: &mut impl Rng,
    ) -> Result<User, GenerateError> {
        require_config(self.config.domains.is_empty(), "domains")?;

        let (name, surname) = Self::generate_name(rng);
        let login = self.generate_login(&name, &surname, rng);
        Ok(self.complete(id, name, surname, login, passports, rng)?)
    }

    /// Generates `count` users with ids `1..=count` and distinct logins.
    ///
    /// A candidate whose login is taken is dropped before anything is minted
    /// for it, so `passports` only holds pairs carried by returned users.
    pub fn generate_batch(
        &self,
        count: usize,
        passports: &mut DocumentRegistry,
        rng: &mut impl Rng,
    ) -> Result<Vec<User>, GenerateError> {
        require_config(self.config.domains.is_empty(), "domains")?;

        let mut logins = HashSet::with_capacity(count);
        let mut users = Vec::with_capacity(count);

        while users.len() < count {
            let (name, surname) = Self::generate_name(rng);
            let login = self.generate_login(&name, &surname, rng);
            if !logins.insert(login.clone()) {
                continue;
            }

            let id = users.len() as RowId + 1;
            users.push(self.complete(id, name, surname, login, passports, rng)?);
        }

        Ok(users)
    }

    fn generate_name(rng: &mut impl Rng) -> (String, String) {
        (FirstName().fake_with_rng(rng), LastName().fake_with_rng(rng))
    }

    /// Fills in everything after the login and builds the record.
    fn complete(
        &self,
        id: RowId,
        name: String,
        surname: String,
        login: String,
        passports: &mut DocumentRegistry,
        rng: &mut impl Rng,
    ) -> Result<User, RecordError> {
        let lastname = if rng.r#gen::<f64>() < self.config.lastname_rate {
            Some(patronymic(rng))
        } else {
            None
        };

        let password: String = Password(8..13).fake_with_rng(rng);
        let role = self.generate_role(rng);

        let is_verified =
            role.is_elevated() || rng.r#gen::<f64>() < self.config.verification_rate;
        let passport = is_verified.then(|| passports.mint(rng));

        User::new(
            id,
            NewUser {
                login,
                password,
                role,
                name,
                surname,
                lastname,
                is_verified,
                passport,
            },
        )
    }

    /// Generates a login address from a name.
    fn generate_login(&self, name: &str, surname: &str, rng: &mut impl Rng) -> String {
        let normalized: String = format!("{name} {surname}")
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == ' ')
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(".");

        let suffix: u32 = rng.gen_range(1..9999);
        let domain = pick(&self.config.domains, rng);

        format!("{normalized}{suffix}@{domain}")
    }

    /// Generates a role based on configured distribution.
    fn generate_role(&self, rng: &mut impl Rng) -> Role {
        let roll: f64 = rng.r#gen();
        let mut cumulative = 0.0;

        for (i, &weight) in self.config.role_distribution.iter().enumerate() {
            cumulative += weight;
            if roll < cumulative {
                return match i {
                    0 => Role::User,
                    1 => Role::Operator,
                    _ => Role::Admin,
                };
            }
        }

        Role::User
    }
}

impl Default for UserGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_generate_user() {
        let user_gen = UserGenerator::new();
        let mut passports = DocumentRegistry::new();
        let mut rng = StdRng::seed_from_u64(42);
        let user = user_gen.generate(1, &mut passports, &mut rng).unwrap();

        assert_eq!(user.id, 1);
        assert!(!user.name.is_empty());
        assert!(user.login.contains('@'));
        assert!((8..13).contains(&user.password.chars().count()));
        assert_eq!(user.passport().is_some(), user.is_verified);
    }

    #[test]
    fn test_generate_batch() {
        let user_gen = UserGenerator::new();
        let mut passports = DocumentRegistry::new();
        let mut rng = StdRng::seed_from_u64(42);
        let users = user_gen.generate_batch(300, &mut passports, &mut rng).unwrap();

        assert_eq!(users.len(), 300);

        let ids: Vec<RowId> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids, (1..=300).collect::<Vec<_>>());

        let logins: HashSet<_> = users.iter().map(|u| &u.login).collect();
        assert_eq!(logins.len(), 300);

        // Passports are unique and the registry holds exactly the issued ones
        let pairs: Vec<_> = users.iter().filter_map(User::passport).collect();
        let distinct: HashSet<_> = pairs.iter().collect();
        assert_eq!(distinct.len(), pairs.len());
        assert!(pairs.iter().all(|p| passports.contains(p)));
        assert_eq!(passports.len(), pairs.len());
    }

    #[test]
    fn test_elevated_roles_always_verified() {
        let user_gen = UserGenerator::new();
        let mut passports = DocumentRegistry::new();
        let mut rng = StdRng::seed_from_u64(5);
        let users = user_gen.generate_batch(500, &mut passports, &mut rng).unwrap();

        let elevated: Vec<&User> = users.iter().filter(|u| u.role.is_elevated()).collect();
        assert!(!elevated.is_empty());
        for user in elevated {
            assert!(user.is_verified);
            assert!(user.passport().is_some());
        }

        // Roughly 80% plain users
        let plain = users.iter().filter(|u| u.role == Role::User).count();
        assert!(plain > 340 && plain < 460, "plain users: {plain}");
    }

    #[test]
    fn test_login_collisions_mint_nothing() {
        // One domain makes repeated logins more likely
        let user_gen = UserGenerator::with_config(UserGenConfig {
            role_distribution: [0.0, 1.0, 0.0],
            domains: vec!["mail.ru".to_string()],
            ..Default::default()
        });
        let mut passports = DocumentRegistry::new();
        let mut rng = StdRng::seed_from_u64(17);
        let users = user_gen.generate_batch(400, &mut passports, &mut rng).unwrap();

        assert!(users.iter().all(|u| u.passport().is_some()));
        assert_eq!(passports.len(), users.len());
    }

    #[test]
    fn test_patronymic_shape() {
        let user_gen = UserGenerator::with_config(UserGenConfig {
            lastname_rate: 1.0,
            ..Default::default()
        });
        let mut passports = DocumentRegistry::new();
        let mut rng = StdRng::seed_from_u64(18);
        let users = user_gen.generate_batch(50, &mut passports, &mut rng).unwrap();

        for user in &users {
            let lastname = user.lastname.as_deref().unwrap();
            assert!(lastname.ends_with("ovich") || lastname.ends_with("ovna"));
        }
    }

    #[test]
    fn test_empty_domains_rejected() {
        let user_gen = UserGenerator::with_config(UserGenConfig {
            domains: Vec::new(),
            ..Default::default()
        });
        let mut passports = DocumentRegistry::new();
        let mut rng = StdRng::seed_from_u64(19);

        let result = user_gen.generate_batch(3, &mut passports, &mut rng);
        assert!(matches!(result, Err(GenerateError::EmptyConfig("domains"))));
        let result = user_gen.generate(1, &mut passports, &mut rng);
        assert!(matches!(result, Err(GenerateError::EmptyConfig("domains"))));
        assert!(passports.is_empty());
    }

    #[test]
    fn test_role_distribution_override() {
        let user_gen = UserGenerator::with_config(UserGenConfig {
            role_distribution: [0.0, 0.0, 1.0],
            ..Default::default()
        });
        let mut passports = DocumentRegistry::new();
        let mut rng = StdRng::seed_from_u64(9);
        let users = user_gen.generate_batch(20, &mut passports, &mut rng).unwrap();

        assert!(users.iter().all(|u| u.role == Role::Admin));
        assert!(users.iter().all(|u| u.passport().is_some()));
    }
}
