//! Car makes and the models each make produces.

pub const CAR_MAKES: &[&str] = &[
    "Toyota",
    "Honda",
    "Ford",
    "BMW",
    "Mercedes",
    "Audi",
    "Volkswagen",
    "Hyundai",
    "Kia",
    "Lexus",
];

/// Returns the model line-up for a make, or `None` for makes outside the catalogue.
pub fn models_for(mark: &str) -> Option<&'static [&'static str]> {
    let models: &'static [&'static str] = match mark {
        "Toyota" => &["Camry", "Corolla", "RAV4", "Prius", "Land Cruiser"],
        "Honda" => &["Accord", "Civic", "CR-V", "Pilot", "Fit"],
        "Ford" => &["Focus", "Fiesta", "Mustang", "Explorer", "F-150"],
        "BMW" => &["3 Series", "5 Series", "X5", "X3", "7 Series"],
        "Mercedes" => &["G-Class", "C-Class", "E-Class", "S-Class", "GLC", "GLE"],
        "Audi" => &["A4", "A6", "Q5", "Q7", "A3"],
        "Volkswagen" => &["Golf", "Passat", "Tiguan", "Polo", "Touareg"],
        "Hyundai" => &["Solaris", "Tucson", "Santa Fe", "Creta", "Elantra"],
        "Kia" => &["Rio", "Sportage", "Sorento", "Optima", "Cerato"],
        "Lexus" => &["RX", "NX", "ES", "LS", "GX"],
        _ => return None,
    };
    Some(models)
}
