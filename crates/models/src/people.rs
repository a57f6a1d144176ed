//! Platform accounts and vehicle owners.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::RowId;
use crate::document::DocumentPair;
use crate::error::RecordError;

/// Minimum age for holding a driving license.
pub const DRIVING_AGE: u8 = 18;

/// Platform account role, stored lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Operator,
    Admin,
}

impl Role {
    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Operator => "operator",
            Role::Admin => "admin",
        }
    }

    /// Operators and admins look up other people's vehicles.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Role::Operator | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform account (`appuser` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: RowId,
    pub login: String,
    pub password: String,
    pub role: Role,
    pub name: String,
    pub surname: String,
    pub lastname: Option<String>,
    pub is_verified: bool,
    pub passport_serial: Option<u16>,
    pub passport_num: Option<u32>,
}

/// User fields before an id is assigned.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub login: String,
    pub password: String,
    pub role: Role,
    pub name: String,
    pub surname: String,
    pub lastname: Option<String>,
    pub is_verified: bool,
    pub passport: Option<DocumentPair>,
}

impl User {
    /// Builds a user, rejecting elevated accounts without verification and a
    /// passport, and passports on unverified accounts.
    pub fn new(id: RowId, new: NewUser) -> Result<Self, RecordError> {
        if new.role.is_elevated() && (!new.is_verified || new.passport.is_none()) {
            return Err(RecordError::UnverifiedElevatedRole(new.role));
        }
        if !new.is_verified && new.passport.is_some() {
            return Err(RecordError::PassportWithoutVerification);
        }

        Ok(Self {
            id,
            login: new.login,
            password: new.password,
            role: new.role,
            name: new.name,
            surname: new.surname,
            lastname: new.lastname,
            is_verified: new.is_verified,
            passport_serial: new.passport.map(|p| p.serial),
            passport_num: new.passport.map(|p| p.number),
        })
    }

    pub fn passport(&self) -> Option<DocumentPair> {
        DocumentPair::from_columns(self.passport_serial, self.passport_num)
    }
}

/// Vehicle owner (`carowner` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: RowId,
    pub name: String,
    pub surname: String,
    pub lastname: Option<String>,
    pub age: u8,
    pub passport_serial: u16,
    pub passport_num: u32,
    pub drive_exp: u8,
    pub drive_license_serial: u16,
    pub drive_license_num: u32,
}

/// Owner fields before an id is assigned.
#[derive(Debug, Clone)]
pub struct NewOwner {
    pub name: String,
    pub surname: String,
    pub lastname: Option<String>,
    pub age: u8,
    pub passport: DocumentPair,
    pub drive_exp: u8,
    pub drive_license: DocumentPair,
}

impl Owner {
    /// Longest driving experience possible at `age`; zero below driving age.
    pub fn max_drive_exp(age: u8) -> u8 {
        age.saturating_sub(DRIVING_AGE)
    }

    pub fn new(id: RowId, new: NewOwner) -> Result<Self, RecordError> {
        if new.drive_exp > Self::max_drive_exp(new.age) {
            return Err(RecordError::DriveExperience {
                age: new.age,
                drive_exp: new.drive_exp,
            });
        }

        Ok(Self {
            id,
            name: new.name,
            surname: new.surname,
            lastname: new.lastname,
            age: new.age,
            passport_serial: new.passport.serial,
            passport_num: new.passport.number,
            drive_exp: new.drive_exp,
            drive_license_serial: new.drive_license.serial,
            drive_license_num: new.drive_license.number,
        })
    }

    pub fn passport(&self) -> DocumentPair {
        DocumentPair {
            serial: self.passport_serial,
            number: self.passport_num,
        }
    }

    pub fn drive_license(&self) -> DocumentPair {
        DocumentPair {
            serial: self.drive_license_serial,
            number: self.drive_license_num,
        }
    }
}
