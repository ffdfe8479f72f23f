use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DAYS: u32 = 3;
pub const DEFAULT_BUDGET: f64 = 10000.0;
pub const DEFAULT_PEOPLE: u32 = 2;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Adventure {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub owner_id: ObjectId,
    pub destination: String,
    #[serde(default)]
    pub places: Vec<Place>,
    pub itinerary: Itinerary,
    #[serde(default)]
    pub options: TripOptions,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    /// `(latitude, longitude)`
    #[serde(default)]
    pub coords: Option<(f64, f64)>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Itinerary {
    pub text: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct TripOptions {
    pub days: u32,
    pub budget: f64,
    pub people: u32,
}

impl Default for TripOptions {
    fn default() -> Self {
        TripOptions {
            days: DEFAULT_DAYS,
            budget: DEFAULT_BUDGET,
            people: DEFAULT_PEOPLE,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryInput {
    pub text: Option<String>,
    pub generated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TripOptionsInput {
    pub days: Option<u32>,
    pub budget: Option<f64>,
    pub people: Option<u32>,
}

impl From<TripOptionsInput> for TripOptions {
    fn from(input: TripOptionsInput) -> Self {
        let defaults = TripOptions::default();
        TripOptions {
            days: input.days.unwrap_or(defaults.days),
            budget: input.budget.unwrap_or(defaults.budget),
            people: input.people.unwrap_or(defaults.people),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateAdventureRequest {
    #[serde(default)]
    pub destination: String,
    pub places: Option<Vec<Place>>,
    pub itinerary: Option<ItineraryInput>,
    pub options: Option<TripOptionsInput>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryView {
    pub text: String,
    pub generated_at: DateTime<Utc>,
}

/// Adventure as returned by the adventure routes.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AdventureView {
    pub id: String,
    pub owner_id: String,
    pub destination: String,
    pub places: Vec<Place>,
    pub itinerary: ItineraryView,
    pub options: TripOptions,
    pub created_at: DateTime<Utc>,
}

/// Fields of a linked adventure shown alongside a community post.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AdventureSummary {
    pub id: String,
    pub destination: String,
    pub places: Vec<Place>,
    pub options: TripOptions,
    pub itinerary: ItineraryView,
}

impl From<&Itinerary> for ItineraryView {
    fn from(itinerary: &Itinerary) -> Self {
        ItineraryView {
            text: itinerary.text.clone(),
            generated_at: itinerary.generated_at,
        }
    }
}

impl From<&Adventure> for AdventureView {
    fn from(adventure: &Adventure) -> Self {
        AdventureView {
            id: adventure.id.to_hex(),
            owner_id: adventure.owner_id.to_hex(),
            destination: adventure.destination.clone(),
            places: adventure.places.clone(),
            itinerary: ItineraryView::from(&adventure.itinerary),
            options: adventure.options,
            created_at: adventure.created_at,
        }
    }
}

impl From<&Adventure> for AdventureSummary {
    fn from(adventure: &Adventure) -> Self {
        AdventureSummary {
            id: adventure.id.to_hex(),
            destination: adventure.destination.clone(),
            places: adventure.places.clone(),
            options: adventure.options,
            itinerary: ItineraryView::from(&adventure.itinerary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_options_take_defaults() {
        let options = TripOptions::from(TripOptionsInput {
            days: Some(5),
            ..Default::default()
        });
        assert_eq!(options.days, 5);
        assert_eq!(options.budget, DEFAULT_BUDGET);
        assert_eq!(options.people, DEFAULT_PEOPLE);
    }

    #[test]
    fn create_request_accepts_coordinate_pairs() {
        let request: CreateAdventureRequest = serde_json::from_value(serde_json::json!({
            "destination": "Lisbon",
            "places": [{ "name": "Belem Tower", "coords": [38.6916, -9.2160] }],
            "itinerary": { "text": "Day 1: Belem" }
        }))
        .unwrap();

        let places = request.places.unwrap();
        assert_eq!(places[0].coords, Some((38.6916, -9.2160)));
        assert!(request.options.is_none());
    }
}
