//! Static showcase of sample cars with simple filters

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

const THREE_HUNDRED_MILLION: u64 = 300_000_000;
const SIX_HUNDRED_MILLION: u64 = 600_000_000;

/// A car listed in the showcase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleCar {
    pub brand: &'static str,
    pub model: &'static str,
    pub body_type: &'static str,
    /// Asking price in whole currency units
    pub price: u64,
}

/// The built-in sample collection
pub fn sample_cars() -> Vec<SampleCar> {
    vec![
        SampleCar { brand: "Toyota", model: "Supra", body_type: "Sports Car", price: 1_200_000_000 },
        SampleCar { brand: "Honda", model: "CR-V", body_type: "SUV", price: 450_000_000 },
        SampleCar { brand: "Mercedes", model: "S-Class", body_type: "Luxury Sedan", price: 1_800_000_000 },
        SampleCar { brand: "Suzuki", model: "Ertiga", body_type: "MPV", price: 220_000_000 },
        SampleCar { brand: "BMW", model: "X5", body_type: "Luxury SUV", price: 1_500_000_000 },
        SampleCar { brand: "Daihatsu", model: "Ayla", body_type: "City Car", price: 130_000_000 },
    ]
}

/// Price ranges offered by the catalog filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBand {
    Under300M,
    From300MTo600M,
    Over600M,
}

impl PriceBand {
    pub fn contains(self, price: u64) -> bool {
        match self {
            PriceBand::Under300M => price < THREE_HUNDRED_MILLION,
            PriceBand::From300MTo600M => {
                (THREE_HUNDRED_MILLION..SIX_HUNDRED_MILLION).contains(&price)
            }
            PriceBand::Over600M => price >= SIX_HUNDRED_MILLION,
        }
    }
}

impl fmt::Display for PriceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PriceBand::Under300M => "under300m",
            PriceBand::From300MTo600M => "300m-600m",
            PriceBand::Over600M => "over600m",
        };
        f.write_str(s)
    }
}

impl FromStr for PriceBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "under300m" => Ok(PriceBand::Under300M),
            "300m-600m" => Ok(PriceBand::From300MTo600M),
            "over600m" => Ok(PriceBand::Over600M),
            other => Err(format!(
                "unknown price band '{}' (expected under300m, 300m-600m or over600m)",
                other
            )),
        }
    }
}

/// Conjunctive catalog filter; `None` matches everything
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub brand: Option<String>,
    pub price: Option<PriceBand>,
    pub body_type: Option<String>,
}

impl CatalogFilter {
    pub fn matches(&self, car: &SampleCar) -> bool {
        let brand_ok = self
            .brand
            .as_deref()
            .map_or(true, |b| car.brand.eq_ignore_ascii_case(b.trim()));
        let price_ok = self.price.map_or(true, |band| band.contains(car.price));
        let body_ok = self
            .body_type
            .as_deref()
            .map_or(true, |t| car.body_type.eq_ignore_ascii_case(t.trim()));

        brand_ok && price_ok && body_ok
    }

    pub fn apply<'a>(&self, cars: &'a [SampleCar]) -> Vec<&'a SampleCar> {
        cars.iter().filter(|car| self.matches(car)).collect()
    }
}

/// Distinct brands in the collection, sorted
pub fn brands(cars: &[SampleCar]) -> Vec<&'static str> {
    let mut brands: Vec<&'static str> = cars.iter().map(|c| c.brand).collect();
    brands.sort_unstable();
    brands.dedup();
    brands
}

/// Distinct body types in the collection, sorted
pub fn body_types(cars: &[SampleCar]) -> Vec<&'static str> {
    let mut types: Vec<&'static str> = cars.iter().map(|c| c.body_type).collect();
    types.sort_unstable();
    types.dedup();
    types
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_filter_returns_all() {
        let cars = sample_cars();
        assert_eq!(CatalogFilter::default().apply(&cars).len(), 6);
    }

    #[test]
    fn test_price_bands() {
        assert!(PriceBand::Under300M.contains(299_999_999));
        assert!(!PriceBand::Under300M.contains(300_000_000));
        assert!(PriceBand::From300MTo600M.contains(300_000_000));
        assert!(!PriceBand::From300MTo600M.contains(600_000_000));
        assert!(PriceBand::Over600M.contains(600_000_000));

        let cars = sample_cars();
        let filter = CatalogFilter {
            price: Some(PriceBand::Under300M),
            ..Default::default()
        };
        let models: Vec<&str> = filter.apply(&cars).iter().map(|c| c.model).collect();
        assert_eq!(models, vec!["Ertiga", "Ayla"]);
    }

    #[test]
    fn test_filters_combine() {
        let cars = sample_cars();
        let filter = CatalogFilter {
            brand: Some("bmw".to_string()),
            price: Some(PriceBand::Over600M),
            body_type: Some("Luxury SUV".to_string()),
        };
        let found = filter.apply(&cars);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].model, "X5");

        let none = CatalogFilter {
            brand: Some("BMW".to_string()),
            price: Some(PriceBand::Under300M),
            body_type: None,
        };
        assert!(none.apply(&cars).is_empty());
    }

    #[test]
    fn test_price_band_parse() {
        assert_eq!("300M-600M".parse::<PriceBand>(), Ok(PriceBand::From300MTo600M));
        assert_eq!(PriceBand::Over600M.to_string(), "over600m");
        assert!("cheap".parse::<PriceBand>().is_err());
    }

    #[test]
    fn test_distinct_lists() {
        let cars = sample_cars();
        assert_eq!(brands(&cars).len(), 6);
        assert!(body_types(&cars).contains(&"MPV"));
    }
}
