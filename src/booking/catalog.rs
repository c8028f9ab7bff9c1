//! Masters and services offered by the shop.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Master {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub experience: String,
    pub price_range: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub price: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub masters: Vec<Master>,
    pub services: Vec<Service>,
}

impl Catalog {
    pub fn master(&self, id: &str) -> Option<&Master> {
        self.masters.iter().find(|master| master.id == id)
    }

    pub fn master_index(&self, id: &str) -> Option<usize> {
        self.masters.iter().position(|master| master.id == id)
    }

    pub fn service_index(&self, id: &str) -> Option<usize> {
        self.services.iter().position(|service| service.id == id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let master = |id: &str, name: &str, specialty: &str, experience: &str, price_range: &str, description: &str| Master {
            id: id.to_string(),
            name: name.to_string(),
            specialty: specialty.to_string(),
            experience: experience.to_string(),
            price_range: price_range.to_string(),
            description: description.to_string(),
        };
        let service = |id: &str, name: &str, price: &str, duration: &str| Service {
            id: id.to_string(),
            name: name.to_string(),
            price: price.to_string(),
            duration: duration.to_string(),
        };

        Self {
            masters: vec![
                master(
                    "1",
                    "Alexander \"Razor\" Petrov",
                    "Classic haircuts and shaving",
                    "8 years",
                    "1500-2500₽",
                    "Classic men's cuts in the British style and traditional straight-razor shaves.",
                ),
                master(
                    "2",
                    "Dmitry \"Style\" Kozlov",
                    "Modern haircuts and styling",
                    "6 years",
                    "1200-2000₽",
                    "Follows current trends and builds a look for any age and hair type.",
                ),
                master(
                    "3",
                    "Mikhail \"Beard\" Sokolov",
                    "Beard and moustache care",
                    "10 years",
                    "800-1500₽",
                    "Beard and moustache specialist, at home with complex shapes.",
                ),
            ],
            services: vec![
                service("haircut", "Men's haircut", "1500₽", "45 min"),
                service("haircut-shave", "Haircut + shave", "2500₽", "60 min"),
                service("styling", "Hair styling", "800₽", "30 min"),
                service("beard-trim", "Beard trim", "1000₽", "30 min"),
                service("full-care", "Full grooming", "3500₽", "90 min"),
                service("kids-haircut", "Kids haircut", "1000₽", "30 min"),
            ],
        }
    }
}
