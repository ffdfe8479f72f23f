use std::sync::Arc;

use log::info;
use mongodb::bson::oid::ObjectId;

use crate::adventure::model::{Adventure, CreateAdventureRequest, Itinerary, TripOptions};
use crate::adventure::store::AdventureStore;
use crate::utils::error::CustomError;
use crate::utils::helpers::now;

pub struct AdventureService {
    store: Arc<dyn AdventureStore>,
}

impl AdventureService {
    pub fn new(store: Arc<dyn AdventureStore>) -> Self {
        AdventureService { store }
    }

    /// Saves an adventure. Only adventures with a generated itinerary are kept.
    pub async fn create_adventure(
        &self,
        owner_id: ObjectId,
        request: CreateAdventureRequest,
    ) -> Result<Adventure, CustomError> {
        let itinerary = request
            .itinerary
            .and_then(|input| {
                let text = input.text.filter(|t| !t.trim().is_empty())?;
                Some(Itinerary {
                    text,
                    generated_at: input.generated_at.unwrap_or_else(now),
                })
            })
            .ok_or_else(|| CustomError::ValidationError("Itinerary is required".into()))?;

        let destination = request.destination.trim().to_string();
        if destination.is_empty() {
            return Err(CustomError::ValidationError(
                "Destination is required".into(),
            ));
        }

        let adventure = Adventure {
            id: ObjectId::new(),
            owner_id,
            destination,
            places: request.places.unwrap_or_default(),
            itinerary,
            options: request.options.map(TripOptions::from).unwrap_or_default(),
            created_at: now(),
        };

        self.store.insert(&adventure).await?;
        info!("adventure {} saved for user {}", adventure.id, owner_id);

        Ok(adventure)
    }

    pub async fn list_adventures(&self, owner_id: &ObjectId) -> Result<Vec<Adventure>, CustomError> {
        self.store.list_for_owner(owner_id).await
    }

    pub async fn get_adventure(
        &self,
        id: &ObjectId,
        owner_id: &ObjectId,
    ) -> Result<Adventure, CustomError> {
        self.store
            .find_owned(id, owner_id)
            .await?
            .ok_or_else(|| CustomError::not_found("Adventure"))
    }

    /// Posts linking the adventure keep their reference; it renders as absent.
    pub async fn delete_adventure(&self, id: &ObjectId, owner_id: &ObjectId) -> Result<(), CustomError> {
        if !self.store.delete_owned(id, owner_id).await? {
            return Err(CustomError::not_found("Adventure"));
        }
        info!("adventure {id} deleted by user {owner_id}");
        Ok(())
    }
}
