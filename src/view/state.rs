//! Ephemeral, page-local state layered over a canonical hotel record.
//!
//! Nothing here is persisted: dropping a [`HotelView`] discards every edit
//! and review it holds.

use crate::model::{Hotel, ReviewError, UserReview};
use std::str::FromStr;
use thiserror::Error;

/// Fields a visitor may edit locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Name,
    City,
    Image,
    Description,
}

impl FromStr for EditField {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "city" => Ok(Self::City),
            "image" => Ok(Self::Image),
            "description" => Ok(Self::Description),
            _ => Err(EditError::UnknownField(s.to_owned())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("no edit in progress")]
    NotEditing,

    #[error("unknown field `{0}`, expected one of: name, city, image, description")]
    UnknownField(String),

    #[error("invalid edit `{0}`, expected `FIELD=VALUE`")]
    Syntax(String),
}

/// Parse the CLI form `FIELD=VALUE`.
pub fn parse_edit(spec: &str) -> Result<(EditField, String), EditError> {
    let (field, value) = spec
        .split_once('=')
        .ok_or_else(|| EditError::Syntax(spec.to_owned()))?;
    Ok((field.parse()?, value.to_owned()))
}

/// Form values while an edit is open.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditDraft {
    pub name: String,
    pub city: String,
    pub image: String,
    pub description: String,
}

impl EditDraft {
    fn from_hotel(hotel: &Hotel) -> Self {
        Self {
            name: hotel.name.clone(),
            city: hotel.city.clone(),
            image: hotel.image.clone(),
            description: hotel.description.clone(),
        }
    }

    fn field_mut(&mut self, field: EditField) -> &mut String {
        match field {
            EditField::Name => &mut self.name,
            EditField::City => &mut self.city,
            EditField::Image => &mut self.image,
            EditField::Description => &mut self.description,
        }
    }
}

/// A hotel as seen during one visit: canonical record, local shadow, reviews.
#[derive(Debug, Clone)]
pub struct HotelView<'a> {
    canonical: &'a Hotel,
    shadow: Option<Hotel>,
    draft: Option<EditDraft>,
    reviews: Vec<UserReview>,
}

impl<'a> HotelView<'a> {
    pub const fn new(canonical: &'a Hotel) -> Self {
        Self {
            canonical,
            shadow: None,
            draft: None,
            reviews: Vec::new(),
        }
    }

    /// The record to display: the saved shadow if any, else the canonical one.
    pub fn hotel(&self) -> &Hotel {
        self.shadow.as_ref().unwrap_or(self.canonical)
    }

    pub const fn canonical(&self) -> &'a Hotel {
        self.canonical
    }

    pub const fn is_edited(&self) -> bool {
        self.shadow.is_some()
    }

    pub const fn draft(&self) -> Option<&EditDraft> {
        self.draft.as_ref()
    }

    pub fn reviews(&self) -> &[UserReview] {
        &self.reviews
    }

    /// Open an edit, seeded from the currently displayed record.
    pub fn begin_edit(&mut self) {
        self.draft = Some(EditDraft::from_hotel(self.hotel()));
    }

    pub fn set(&mut self, field: EditField, value: impl Into<String>) -> Result<(), EditError> {
        let draft = self.draft.as_mut().ok_or(EditError::NotEditing)?;
        *draft.field_mut(field) = value.into();
        Ok(())
    }

    /// Close the edit and apply the draft to the local shadow.
    pub fn save(&mut self) -> Result<&Hotel, EditError> {
        let draft = self.draft.take().ok_or(EditError::NotEditing)?;
        let shadow = Hotel {
            name: draft.name,
            city: draft.city,
            image: draft.image,
            description: draft.description,
            ..self.hotel().clone()
        };
        Ok(self.shadow.insert(shadow))
    }

    /// Discard the open draft. The shadow, if any, is kept.
    #[allow(unused)]
    pub fn cancel_edit(&mut self) {
        self.draft = None;
    }

    pub fn add_review(&mut self, rating: u8, author: &str, comment: &str) -> Result<(), ReviewError> {
        self.reviews.push(UserReview::new(rating, author, comment)?);
        Ok(())
    }
}
