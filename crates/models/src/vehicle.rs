//! Vehicles and their registration (STS) and title (PTS) documents.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::RowId;
use crate::catalog::models_for;
use crate::document::DocumentPair;
use crate::error::RecordError;

pub const VIN_LEN: usize = 17;

/// Returns true for a 17-character VIN over `A-Z0-9`.
pub fn is_valid_vin(vin: &str) -> bool {
    vin.len() == VIN_LEN
        && vin
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// Vehicle (`car` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: RowId,
    pub owner_id: RowId,
    pub mark: String,
    pub model: String,
    pub vin: String,
    pub mileage: u32,
    pub color: String,
}

#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub owner_id: RowId,
    pub mark: String,
    pub model: String,
    pub vin: String,
    pub mileage: u32,
    pub color: String,
}

impl Vehicle {
    pub fn new(id: RowId, new: NewVehicle) -> Result<Self, RecordError> {
        let models = models_for(&new.mark).ok_or_else(|| RecordError::UnknownMake(new.mark.clone()))?;
        if !models.contains(&new.model.as_str()) {
            return Err(RecordError::ModelMismatch {
                mark: new.mark,
                model: new.model,
            });
        }
        if !is_valid_vin(&new.vin) {
            return Err(RecordError::InvalidVin(new.vin));
        }

        Ok(Self {
            id,
            owner_id: new.owner_id,
            mark: new.mark,
            model: new.model,
            vin: new.vin,
            mileage: new.mileage,
            color: new.color,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

impl EngineType {
    pub const ALL: [EngineType; 4] = [
        EngineType::Petrol,
        EngineType::Diesel,
        EngineType::Electric,
        EngineType::Hybrid,
    ];
}

/// Vehicle size class as printed on the registration certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarClass {
    A,
    B,
    C,
    D,
    E,
    F,
    S,
    M,
    J,
}

impl CarClass {
    pub const ALL: [CarClass; 9] = [
        CarClass::A,
        CarClass::B,
        CarClass::C,
        CarClass::D,
        CarClass::E,
        CarClass::F,
        CarClass::S,
        CarClass::M,
        CarClass::J,
    ];
}

/// Vehicle registration certificate (`sts` table).
///
/// Binds one vehicle to one owner and carries the plate number (`gos_num`)
/// that cameras observe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    pub id: RowId,
    pub car_id: RowId,
    pub owner_id: RowId,
    pub vin: String,
    pub gos_num: String,
    pub mark: String,
    pub model: String,
    pub horse_power: u16,
    pub car_weight: u16,
    pub sts_serial: u16,
    pub sts_num: u32,
    pub engine_type: EngineType,
    pub car_class: CarClass,
    #[serde(with = "crate::formats::date")]
    pub release_date: Date,
    #[serde(with = "crate::formats::date")]
    pub reg_date: Date,
}

#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub owner_id: RowId,
    pub gos_num: String,
    pub horse_power: u16,
    pub car_weight: u16,
    pub document: DocumentPair,
    pub engine_type: EngineType,
    pub car_class: CarClass,
    pub release_date: Date,
    pub reg_date: Date,
}

impl RegistrationRecord {
    /// Builds a registration for `vehicle`, copying its VIN, make and model.
    pub fn new(id: RowId, vehicle: &Vehicle, new: NewRegistration) -> Result<Self, RecordError> {
        if new.reg_date < new.release_date {
            return Err(RecordError::RegisteredBeforeRelease {
                release_date: new.release_date,
                reg_date: new.reg_date,
            });
        }

        Ok(Self {
            id,
            car_id: vehicle.id,
            owner_id: new.owner_id,
            vin: vehicle.vin.clone(),
            gos_num: new.gos_num,
            mark: vehicle.mark.clone(),
            model: vehicle.model.clone(),
            horse_power: new.horse_power,
            car_weight: new.car_weight,
            sts_serial: new.document.serial,
            sts_num: new.document.number,
            engine_type: new.engine_type,
            car_class: new.car_class,
            release_date: new.release_date,
            reg_date: new.reg_date,
        })
    }

    pub fn document(&self) -> DocumentPair {
        DocumentPair {
            serial: self.sts_serial,
            number: self.sts_num,
        }
    }
}

/// Vehicle title / import document (`pts` table), one per registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleRecord {
    pub id: RowId,
    pub sts_id: RowId,
    pub pts_serial: u16,
    pub pts_number: u32,
    pub import_country: String,
}

impl TitleRecord {
    pub fn new(id: RowId, sts_id: RowId, document: DocumentPair, import_country: String) -> Self {
        Self {
            id,
            sts_id,
            pts_serial: document.serial,
            pts_number: document.number,
            import_country,
        }
    }

    pub fn document(&self) -> DocumentPair {
        DocumentPair {
            serial: self.pts_serial,
            number: self.pts_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn new_vehicle(mark: &str, model: &str, vin: &str) -> NewVehicle {
        NewVehicle {
            owner_id: 3,
            mark: mark.into(),
            model: model.into(),
            vin: vin.into(),
            mileage: 42_000,
            color: "Black".into(),
        }
    }

    #[test]
    fn test_vehicle_model_must_match_make() {
        assert!(Vehicle::new(1, new_vehicle("Kia", "Rio", "XW8ZZZ61ZJG012345")).is_ok());
        assert_eq!(
            Vehicle::new(1, new_vehicle("Kia", "Camry", "XW8ZZZ61ZJG012345")),
            Err(RecordError::ModelMismatch {
                mark: "Kia".into(),
                model: "Camry".into()
            })
        );
        assert_eq!(
            Vehicle::new(1, new_vehicle("Lada", "Vesta", "XW8ZZZ61ZJG012345")),
            Err(RecordError::UnknownMake("Lada".into()))
        );
    }

    #[test]
    fn test_vin_validation() {
        assert!(is_valid_vin("1HGCM82633A004352"));
        assert!(!is_valid_vin("1HGCM82633A00435"));
        assert!(!is_valid_vin("1hgcm82633a004352"));
        assert!(!is_valid_vin("1HGCM82633A00435-"));
    }

    #[test]
    fn test_registration_dates_ordered() {
        let vehicle = Vehicle::new(5, new_vehicle("Audi", "A4", "WAUZZZ8K9BA012345")).unwrap();
        let registration = |release_date, reg_date| NewRegistration {
            owner_id: 3,
            gos_num: "А123ВС77".into(),
            horse_power: 150,
            car_weight: 1500,
            document: DocumentPair::new(1234, 123_456).unwrap(),
            engine_type: EngineType::Diesel,
            car_class: CarClass::D,
            release_date,
            reg_date,
        };

        let sts =
            RegistrationRecord::new(1, &vehicle, registration(date!(2015 - 03 - 01), date!(2015 - 03 - 01)))
                .unwrap();
        assert_eq!(sts.car_id, 5);
        assert_eq!(sts.vin, vehicle.vin);
        assert_eq!(sts.model, "A4");

        assert!(matches!(
            RegistrationRecord::new(1, &vehicle, registration(date!(2015 - 03 - 01), date!(2015 - 02 - 28))),
            Err(RecordError::RegisteredBeforeRelease { .. })
        ));
    }

    #[test]
    fn test_registration_csv_layout() {
        let vehicle = Vehicle::new(5, new_vehicle("Audi", "A4", "WAUZZZ8K9BA012345")).unwrap();
        let sts = RegistrationRecord::new(
            9,
            &vehicle,
            NewRegistration {
                owner_id: 3,
                gos_num: "А123ВС77".into(),
                horse_power: 150,
                car_weight: 1500,
                document: DocumentPair::new(1234, 123_456).unwrap(),
                engine_type: EngineType::Electric,
                car_class: CarClass::S,
                release_date: date!(2019 - 01 - 09),
                reg_date: date!(2020 - 11 - 30),
            },
        )
        .unwrap();

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(&sts).unwrap();
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let mut lines = out.lines();

        assert_eq!(
            lines.next(),
            Some(
                "id,car_id,owner_id,vin,gos_num,mark,model,horse_power,car_weight,sts_serial,sts_num,engine_type,car_class,release_date,reg_date"
            )
        );
        assert_eq!(
            lines.next(),
            Some("9,5,3,WAUZZZ8K9BA012345,А123ВС77,Audi,A4,150,1500,1234,123456,electric,S,2019-01-09,2020-11-30")
        );
    }
}
