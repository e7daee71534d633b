use rust_decimal_macros::dec;

use crate::models::{Category, ServiceOffering};

/// The built-in service catalog. Data mirrors the storefront's published
/// offering list; ids are stable and referenced by carts and bookings.
pub fn seed_offerings() -> Vec<ServiceOffering> {
    vec![
        ServiceOffering {
            id: "ac-1".to_string(),
            name: "AC Power Jet Service".to_string(),
            description: "Advanced foam cleaning of cooling coils, blower, and outdoor unit for 2x cooling.".to_string(),
            price: dec!(699),
            category: Category::AcServices,
            duration: "45 mins".to_string(),
            rating: 4.8,
            image_url: "https://images.unsplash.com/photo-1621905252507-b35492cc74b9?auto=format&fit=crop&q=80&w=800".to_string(),
            popular: true,
            bestseller: true,
        },
        ServiceOffering {
            id: "ac-2".to_string(),
            name: "AC Gas Refill (Complete)".to_string(),
            description: "Vacuuming, leak testing, and complete gas recharge (R32/R410A).".to_string(),
            price: dec!(2499),
            category: Category::AcServices,
            duration: "1 hr".to_string(),
            rating: 4.7,
            image_url: "https://images.unsplash.com/photo-1545259741-2ea3ebf61fa3?auto=format&fit=crop&q=80&w=800".to_string(),
            popular: false,
            bestseller: false,
        },
        ServiceOffering {
            id: "ac-3".to_string(),
            name: "AC Installation".to_string(),
            description: "Professional installation with vacuum sealing and copper pipe setup.".to_string(),
            price: dec!(1599),
            category: Category::AcServices,
            duration: "2 hrs".to_string(),
            rating: 4.6,
            image_url: "https://images.unsplash.com/photo-1631545089304-453bb324203b?auto=format&fit=crop&q=80&w=800".to_string(),
            popular: false,
            bestseller: false,
        },
        ServiceOffering {
            id: "ac-4".to_string(),
            name: "AC Uninstallation".to_string(),
            description: "Safely pumping down gas and removing indoor/outdoor units.".to_string(),
            price: dec!(799),
            category: Category::AcServices,
            duration: "45 mins".to_string(),
            rating: 4.5,
            image_url: "https://images.unsplash.com/photo-1581094794329-cd1361ddee2e?auto=format&fit=crop&q=80&w=800".to_string(),
            popular: false,
            bestseller: false,
        },
        ServiceOffering {
            id: "ac-5".to_string(),
            name: "AC PCB Repair".to_string(),
            description: "Diagnosis and repair of inverter/non-inverter AC circuit boards.".to_string(),
            price: dec!(1299),
            category: Category::AcServices,
            duration: "24-48 hrs".to_string(),
            rating: 4.4,
            image_url: "https://plus.unsplash.com/premium_photo-1678732559599-b1d563533800?auto=format&fit=crop&q=80&w=800".to_string(),
            popular: false,
            bestseller: false,
        },
        ServiceOffering {
            id: "pl-1".to_string(),
            name: "Tap & Mixer Repair".to_string(),
            description: "Fixing dripping taps, changing spindles, or installing new mixers.".to_string(),
            price: dec!(199),
            category: Category::Plumbing,
            duration: "30 mins".to_string(),
            rating: 4.5,
            image_url: "https://images.unsplash.com/photo-1585704032915-c3400ca199e7?auto=format&fit=crop&q=80&w=800".to_string(),
            popular: false,
            bestseller: false,
        },
        ServiceOffering {
            id: "pl-2".to_string(),
            name: "Intensive Drain Cleaning".to_string(),
            description: "Removing tough blockages in kitchen sinks or bathrooms using chemicals/springs.".to_string(),
            price: dec!(499),
            category: Category::Plumbing,
            duration: "45 mins".to_string(),
            rating: 4.9,
            image_url: "https://images.unsplash.com/photo-1607472586893-edb57bdc0e39?auto=format&fit=crop&q=80&w=800".to_string(),
            popular: true,
            bestseller: true,
        },
        ServiceOffering {
            id: "pl-3".to_string(),
            name: "Water Tank Cleaning (500L-1000L)".to_string(),
            description: "Mechanized de-watering, sludge removal, and UV sanitization.".to_string(),
            price: dec!(999),
            category: Category::Plumbing,
            duration: "1.5 hrs".to_string(),
            rating: 4.7,
            image_url: "https://images.unsplash.com/photo-1626084478315-74895781a8b4?auto=format&fit=crop&q=80&w=800".to_string(),
            popular: false,
            bestseller: false,
        },
        ServiceOffering {
            id: "pl-4".to_string(),
            name: "Western Toilet Installation".to_string(),
            description: "Installing wall-mounted or floor-mounted western commodes.".to_string(),
            price: dec!(1199),
            category: Category::Plumbing,
            duration: "2 hrs".to_string(),
            rating: 4.6,
            image_url: "https://images.unsplash.com/photo-1584622650111-993a426fbf0a?auto=format&fit=crop&q=80&w=800".to_string(),
            popular: false,
            bestseller: false,
        },
        ServiceOffering {
            id: "pl-5".to_string(),
            name: "Shower Installation".to_string(),
            description: "Installing overhead showers, hand showers, or divertor panels.".to_string(),
            price: dec!(349),
            category: Category::Plumbing,
            duration: "45 mins".to_string(),
            rating: 4.8,
            image_url: "https://images.unsplash.com/photo-1559302504-64aae6ca6b6f?auto=format&fit=crop&q=80&w=800".to_string(),
            popular: false,
            bestseller: false,
        },
        ServiceOffering {
            id: "el-1".to_string(),
            name: "Fan Repair & Install".to_string(),
            description: "Repairing noise/wobble or installing new ceiling/exhaust fans.".to_string(),
            price: dec!(249),
            category: Category::Electrical,
            duration: "30 mins".to_string(),
            rating: 4.6,
            image_url: "https://images.unsplash.com/photo-1616422323719-7e21a224f84f?auto=format&fit=crop&q=80&w=800".to_string(),
            popular: false,
            bestseller: false,
        },
        ServiceOffering {
            id: "el-2".to_string(),
            name: "Switchboard Repair".to_string(),
            description: "Replacing burnt switches, sockets, or fixing loose connections.".to_string(),
            price: dec!(149),
            category: Category::Electrical,
            duration: "20 mins".to_string(),
            rating: 4.8,
            image_url: "https://images.unsplash.com/photo-1556761175-5973dc0f32e7?auto=format&fit=crop&q=80&w=800".to_string(),
            popular: false,
            bestseller: false,
        },
        ServiceOffering {
            id: "el-3".to_string(),
            name: "Full Home Electrical Checkup".to_string(),
            description: "Comprehensive health check of MCBs, wiring, and earthing to prevent shocks.".to_string(),
            price: dec!(699),
            category: Category::Electrical,
            duration: "1 hr".to_string(),
            rating: 4.9,
            image_url: "https://images.unsplash.com/photo-1621905251189-08b45d6a269e?auto=format&fit=crop&q=80&w=800".to_string(),
            popular: true,
            bestseller: false,
        },
        ServiceOffering {
            id: "el-4".to_string(),
            name: "Chandelier Installation".to_string(),
            description: "Heavy duty drilling and secure mounting for decorative lights.".to_string(),
            price: dec!(599),
            category: Category::Electrical,
            duration: "1 hr".to_string(),
            rating: 4.7,
            image_url: "https://images.unsplash.com/photo-1540932296774-7dd57d60910b?auto=format&fit=crop&q=80&w=800".to_string(),
            popular: false,
            bestseller: false,
        },
        ServiceOffering {
            id: "ap-1".to_string(),
            name: "Geyser Repair (Electric)".to_string(),
            description: "Fixing heating issues, thermostat replacement, or leakage repair.".to_string(),
            price: dec!(399),
            category: Category::Appliances,
            duration: "1 hr".to_string(),
            rating: 4.6,
            image_url: "https://plus.unsplash.com/premium_photo-1663089851613-207077659556?auto=format&fit=crop&q=80&w=800".to_string(),
            popular: false,
            bestseller: false,
        },
        ServiceOffering {
            id: "ap-2".to_string(),
            name: "Washing Machine Repair".to_string(),
            description: "Fixing drum issues, water drainage, or spin motor problems.".to_string(),
            price: dec!(499),
            category: Category::Appliances,
            duration: "1 hr".to_string(),
            rating: 4.5,
            image_url: "https://images.unsplash.com/photo-1626806819282-2c1dc01a5e0c?auto=format&fit=crop&q=80&w=800".to_string(),
            popular: false,
            bestseller: false,
        },
        ServiceOffering {
            id: "ap-3".to_string(),
            name: "Refrigerator Checkup".to_string(),
            description: "Gas check, compressor diagnostics, and cooling issue resolution.".to_string(),
            price: dec!(349),
            category: Category::Appliances,
            duration: "45 mins".to_string(),
            rating: 4.7,
            image_url: "https://images.unsplash.com/photo-1571175443880-49e1d58b794a?auto=format&fit=crop&q=80&w=800".to_string(),
            popular: false,
            bestseller: false,
        },
        ServiceOffering {
            id: "sm-1".to_string(),
            name: "Smart Lock Installation".to_string(),
            description: "Installing digital locks for main doors with app configuration.".to_string(),
            price: dec!(1299),
            category: Category::SmartHome,
            duration: "1.5 hrs".to_string(),
            rating: 4.9,
            image_url: "https://images.unsplash.com/photo-1558002038-1091a166111c?auto=format&fit=crop&q=80&w=800".to_string(),
            popular: false,
            bestseller: false,
        },
        ServiceOffering {
            id: "sm-2".to_string(),
            name: "Video Doorbell Setup".to_string(),
            description: "Smart doorbell mounting and WiFi setup.".to_string(),
            price: dec!(899),
            category: Category::SmartHome,
            duration: "1 hr".to_string(),
            rating: 4.8,
            image_url: "https://images.unsplash.com/photo-1593121925328-369cc8459c08?auto=format&fit=crop&q=80&w=800".to_string(),
            popular: false,
            bestseller: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_has_nineteen_offerings() {
        assert_eq!(seed_offerings().len(), 19);
    }

    #[test]
    fn test_seed_ids_are_unique() {
        let offerings = seed_offerings();
        let mut ids: Vec<&str> = offerings.iter().map(|o| o.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), offerings.len());
    }

    #[test]
    fn test_seed_covers_every_category() {
        let offerings = seed_offerings();
        for category in Category::ALL {
            assert!(
                offerings.iter().any(|o| o.category == category),
                "no offerings in {}",
                category
            );
        }
    }

    #[test]
    fn test_seed_prices_are_positive() {
        for offering in seed_offerings() {
            assert!(offering.price > rust_decimal::Decimal::ZERO, "{}", offering.id);
        }
    }
}
