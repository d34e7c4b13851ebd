pub mod prelude {
    pub use super::{element::Element, fortune::FortuneRecord};
}

pub mod fortune {
    use serde::{Deserialize, Serialize};

    use super::element::Element;

    /// Domain model for a single fortune reading.
    ///
    /// Built fresh for every generation request and never mutated afterwards.
    /// Field names are serialized in camelCase so the browser receives the same
    /// shape the model is prompted to produce.
    ///
    #[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
    #[serde(rename_all = "camelCase")]
    pub struct FortuneRecord {
        pub message: String,
        pub interpretation: String,
        pub lucky_numbers: String,
        pub lucky_color: String,
        pub lucky_element: String,
        pub timeframe: String,
    }

    impl FortuneRecord {
        pub const DEFAULT_MESSAGE: &'static str = "The path to wisdom begins with a single step.";
        pub const DEFAULT_INTERPRETATION: &'static str = "Your journey toward understanding is just beginning. Each decision you make now will shape your future.";
        pub const DEFAULT_LUCKY_NUMBERS: &'static str = "3, 7, 9";
        pub const DEFAULT_LUCKY_COLOR: &'static str = "Red";
        pub const DEFAULT_LUCKY_ELEMENT: &'static str = "Fire";
        pub const DEFAULT_TIMEFRAME: &'static str = "Coming days";

        /// The record made entirely of per-field defaults.
        ///
        /// Each field is used individually when a parsed reply leaves it
        /// missing or empty.
        ///
        pub fn defaults() -> Self {
            Self {
                message: Self::DEFAULT_MESSAGE.to_string(),
                interpretation: Self::DEFAULT_INTERPRETATION.to_string(),
                lucky_numbers: Self::DEFAULT_LUCKY_NUMBERS.to_string(),
                lucky_color: Self::DEFAULT_LUCKY_COLOR.to_string(),
                lucky_element: Self::DEFAULT_LUCKY_ELEMENT.to_string(),
                timeframe: Self::DEFAULT_TIMEFRAME.to_string(),
            }
        }

        /// The record returned when the model reply holds no parseable JSON.
        ///
        /// Deliberately differs from [`FortuneRecord::defaults`] in every field.
        ///
        pub fn fallback() -> Self {
            Self {
                message: "Fortune favors the prepared mind.".to_string(),
                interpretation: "Success will come to those who are ready for opportunity. Stay vigilant and open to possibilities.".to_string(),
                lucky_numbers: "8, 12, 24".to_string(),
                lucky_color: "Gold".to_string(),
                lucky_element: "Metal".to_string(),
                timeframe: "This month".to_string(),
            }
        }

        /// The lucky element as one of the five classical elements, if it is one.
        pub fn element(&self) -> Option<Element> {
            self.lucky_element.parse().ok()
        }
    }
}

pub mod element {
    use serde::{Deserialize, Serialize};

    /// The five Chinese elements the model is asked to pick from.
    ///
    /// The generator never rejects other values, this is only a typed view.
    ///
    #[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Element {
        Wood,
        Fire,
        Earth,
        Metal,
        Water,
    }

    impl std::str::FromStr for Element {
        type Err = ();

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.trim().to_ascii_lowercase().as_str() {
                "wood" => Ok(Self::Wood),
                "fire" => Ok(Self::Fire),
                "earth" => Ok(Self::Earth),
                "metal" => Ok(Self::Metal),
                "water" => Ok(Self::Water),
                _ => Err(()),
            }
        }
    }

    impl std::fmt::Display for Element {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            let name = match self {
                Self::Wood => "Wood",
                Self::Fire => "Fire",
                Self::Earth => "Earth",
                Self::Metal => "Metal",
                Self::Water => "Water",
            };
            f.write_str(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn defaults_and_fallback_differ_in_every_field() {
        let defaults = FortuneRecord::defaults();
        let fallback = FortuneRecord::fallback();

        assert_ne!(defaults.message, fallback.message);
        assert_ne!(defaults.interpretation, fallback.interpretation);
        assert_ne!(defaults.lucky_numbers, fallback.lucky_numbers);
        assert_ne!(defaults.lucky_color, fallback.lucky_color);
        assert_ne!(defaults.lucky_element, fallback.lucky_element);
        assert_ne!(defaults.timeframe, fallback.timeframe);
    }

    #[test]
    fn serializes_with_camel_case_field_names() {
        let json = serde_json::to_value(FortuneRecord::fallback()).unwrap();

        assert_eq!(json["luckyNumbers"], "8, 12, 24");
        assert_eq!(json["luckyColor"], "Gold");
        assert_eq!(json["luckyElement"], "Metal");
        assert_eq!(json.as_object().unwrap().len(), 6);
    }

    #[test]
    fn element_is_parsed_leniently_but_not_enforced() {
        let mut record = FortuneRecord::defaults();
        assert_eq!(record.element(), Some(Element::Fire));

        record.lucky_element = " water ".to_string();
        assert_eq!(record.element(), Some(Element::Water));

        record.lucky_element = "Lightning".to_string();
        assert_eq!(record.element(), None);
        assert_eq!(Element::Metal.to_string(), "Metal");
    }
}
