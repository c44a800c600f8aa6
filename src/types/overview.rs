use serde::Serialize;

use crate::db::{Appointment, Medication, Pet, PetcareStorage};
use crate::error::PetcareError;

/// Dashboard row: a pet with everything recorded for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PetOverview {
    pub pet: Pet,
    pub appointments: Vec<Appointment>,
    pub medications: Vec<Medication>,
}

impl PetOverview {
    /// Load all of `owner_id`'s pets, then two queries per pet.
    pub async fn load_for_owner(
        storage: &PetcareStorage,
        owner_id: i64,
    ) -> Result<Vec<Self>, PetcareError> {
        let pets = storage.pets_by_owner(owner_id).await?;
        let mut overviews = Vec::with_capacity(pets.len());
        for pet in pets {
            let appointments = storage.appointments_by_pet(pet.id).await?;
            let medications = storage.medications_by_pet(pet.id).await?;
            overviews.push(Self {
                pet,
                appointments,
                medications,
            });
        }
        Ok(overviews)
    }
}
