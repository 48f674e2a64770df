//! Outfit suggestion engine
//!
//! Maps current conditions to clothing recommendations using simple
//! temperature-threshold branching, with add-ons for rain, wind and UV.

use crate::data::CurrentConditions;

/// Wind speed above which a wind layer is recommended (km/h)
const WINDY_THRESHOLD_KPH: f64 = 30.0;

/// UV index at which sunscreen is recommended
const UV_SUNSCREEN_THRESHOLD: f64 = 6.0;

/// Outfit categories users can pick suggestions for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutfitCategory {
    /// Everyday wear
    Casual,
    /// Office or event wear
    Formal,
    /// Workout wear
    Gym,
}

impl OutfitCategory {
    /// Returns a slice containing all category variants.
    pub fn all() -> &'static [OutfitCategory] {
        &[
            OutfitCategory::Casual,
            OutfitCategory::Formal,
            OutfitCategory::Gym,
        ]
    }

    /// Returns a human-readable display label for the category.
    pub fn label(&self) -> &'static str {
        match self {
            OutfitCategory::Casual => "Casual",
            OutfitCategory::Formal => "Formal",
            OutfitCategory::Gym => "Gym",
        }
    }

    /// Parses user input into an OutfitCategory.
    ///
    /// Matching is case-insensitive and supports aliases:
    /// - "casual" | "everyday" -> Casual
    /// - "formal" | "office" | "work" -> Formal
    /// - "gym" | "workout" | "sport" -> Gym
    ///
    /// Returns `None` if the input doesn't match any category.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<OutfitCategory> {
        match s.to_lowercase().trim() {
            "casual" | "everyday" => Some(OutfitCategory::Casual),
            "formal" | "office" | "work" => Some(OutfitCategory::Formal),
            "gym" | "workout" | "sport" => Some(OutfitCategory::Gym),
            _ => None,
        }
    }
}

/// Temperature bands driving the clothing branch.
///
/// Casual wear uses all five bands (30/20/10/0 °C boundaries); formal and
/// gym wear collapse to three (25/15 °C boundaries).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempBand {
    /// 30°C and above (25°C for formal/gym)
    Hot,
    /// 20-30°C
    Warm,
    /// 10-20°C (15-25°C for formal/gym)
    Mild,
    /// 0-10°C (below 15°C for formal/gym)
    Cold,
    /// Below freezing
    Freezing,
}

impl TempBand {
    /// Maps a temperature to the band used for the given category.
    pub fn for_category(category: OutfitCategory, temp_c: f64) -> TempBand {
        match category {
            OutfitCategory::Casual => {
                if temp_c >= 30.0 {
                    TempBand::Hot
                } else if temp_c >= 20.0 {
                    TempBand::Warm
                } else if temp_c >= 10.0 {
                    TempBand::Mild
                } else if temp_c >= 0.0 {
                    TempBand::Cold
                } else {
                    TempBand::Freezing
                }
            }
            OutfitCategory::Formal | OutfitCategory::Gym => {
                if temp_c >= 25.0 {
                    TempBand::Hot
                } else if temp_c >= 15.0 {
                    TempBand::Mild
                } else {
                    TempBand::Cold
                }
            }
        }
    }
}

/// A complete clothing suggestion for the current weather.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutfitSuggestion {
    /// Upper-body garment
    pub top: &'static str,
    /// Lower-body garment
    pub bottom: &'static str,
    /// Footwear
    pub footwear: &'static str,
    /// Accessories, including weather-driven add-ons
    pub accessories: Vec<&'static str>,
}

/// Builds the clothing suggestion for a category under the given conditions.
///
/// The base outfit is chosen by temperature band; precipitation, strong
/// wind and high UV append accessories on top.
pub fn suggest_outfit(category: OutfitCategory, current: &CurrentConditions) -> OutfitSuggestion {
    let band = TempBand::for_category(category, current.temp_c);
    let mut suggestion = base_outfit(category, band);

    if is_wet(current) {
        suggestion.accessories.push("Umbrella");
        suggestion.accessories.push("Waterproof shell");
    }
    if current.wind_kph >= WINDY_THRESHOLD_KPH {
        suggestion.accessories.push("Windbreaker");
    }
    if current.uv >= UV_SUNSCREEN_THRESHOLD {
        suggestion.accessories.push("Sunscreen");
    }

    suggestion
}

/// Returns whether the current conditions call for rain gear
///
/// Provider condition codes 2xx/3xx/5xx are thunderstorm, drizzle and
/// rain; measured precipitation counts regardless of code.
fn is_wet(current: &CurrentConditions) -> bool {
    let code = current.condition.code;
    current.precip_mm > 0.0 || (200..600).contains(&code)
}

/// The temperature-banded base outfit per category
fn base_outfit(category: OutfitCategory, band: TempBand) -> OutfitSuggestion {
    match category {
        OutfitCategory::Casual => match band {
            TempBand::Hot => OutfitSuggestion {
                top: "Linen or cotton short-sleeve shirt",
                bottom: "Lightweight chino shorts",
                footwear: "Canvas sneakers or sandals",
                accessories: vec!["Sunglasses", "Cap", "Water bottle"],
            },
            TempBand::Warm => OutfitSuggestion {
                top: "Polo shirt or casual button-down",
                bottom: "Chinos or jeans",
                footwear: "Canvas sneakers or boat shoes",
                accessories: vec!["Lightweight jacket"],
            },
            TempBand::Mild => OutfitSuggestion {
                top: "Flannel shirt over t-shirt or light sweater",
                bottom: "Jeans or chinos",
                footwear: "Leather boots or sneakers",
                accessories: vec!["Denim or field jacket", "Beanie"],
            },
            TempBand::Cold => OutfitSuggestion {
                top: "Thermal base layer with sweater and insulated jacket",
                bottom: "Thermal base layer under jeans",
                footwear: "Waterproof winter boots",
                accessories: vec!["Puffer jacket", "Beanie", "Gloves"],
            },
            TempBand::Freezing => OutfitSuggestion {
                top: "Thermal base layer, flannel shirt, down vest and parka",
                bottom: "Thermal base layer with insulated pants",
                footwear: "Insulated winter boots",
                accessories: vec!["Heavy parka", "Balaclava", "Insulated gloves"],
            },
        },
        OutfitCategory::Formal => match band {
            TempBand::Hot | TempBand::Warm => OutfitSuggestion {
                top: "Lightweight cotton or linen dress shirt",
                bottom: "Light-colored dress pants",
                footwear: "Loafers",
                accessories: vec!["Sunglasses"],
            },
            TempBand::Mild => OutfitSuggestion {
                top: "Dress shirt with tie",
                bottom: "Wool-blend suit pants",
                footwear: "Oxfords or derby shoes",
                accessories: vec!["Light blazer", "Leather belt"],
            },
            TempBand::Cold | TempBand::Freezing => OutfitSuggestion {
                top: "Dress shirt with wool sweater",
                bottom: "Tailored wool dress pants",
                footwear: "Leather dress shoes",
                accessories: vec!["Topcoat", "Wool scarf", "Leather gloves"],
            },
        },
        OutfitCategory::Gym => match band {
            TempBand::Hot | TempBand::Warm => OutfitSuggestion {
                top: "Moisture-wicking tank top",
                bottom: "Athletic shorts",
                footwear: "Breathable running shoes",
                accessories: vec!["Sweatband", "Water bottle"],
            },
            TempBand::Mild => OutfitSuggestion {
                top: "Moisture-wicking t-shirt",
                bottom: "Training shorts or joggers",
                footwear: "Cross-training shoes",
                accessories: vec!["Gym towel", "Water bottle"],
            },
            TempBand::Cold | TempBand::Freezing => OutfitSuggestion {
                top: "Moisture-wicking long-sleeve base layer",
                bottom: "Athletic pants",
                footwear: "Indoor training shoes",
                accessories: vec!["Training gloves", "Water bottle"],
            },
        },
    }
}
