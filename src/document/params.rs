//! Typed parameter fields and the binding schema checked before a run.

use std::collections::BTreeSet;

use crate::error::{DocumentError, Result};

/// Element categories parameters can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Floors,
    Ceilings,
    Walls,
    Rooms,
}

impl Category {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Floors => "floors",
            Self::Ceilings => "ceilings",
            Self::Walls => "walls",
            Self::Rooms => "rooms",
        }
    }

    /// Categories that receive generated finish elements.
    pub const FINISHES: [Self; 3] = [Self::Floors, Self::Ceilings, Self::Walls];
}

/// Metadata stamped onto generated elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetadataField {
    RoomName,
    RoomNumber,
    LevelCode,
    /// All room names sharing the element's type.
    RoomNames,
    /// All room numbers sharing the element's type.
    RoomNumbers,
}

impl MetadataField {
    pub const ALL: [Self; 5] = [
        Self::RoomName,
        Self::RoomNumber,
        Self::LevelCode,
        Self::RoomNames,
        Self::RoomNumbers,
    ];

    /// Shared parameter name in the host document.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::RoomName => "DPM_AR_Отделка.Имя",
            Self::RoomNumber => "DPM_AR_Отделка.Номер",
            Self::LevelCode => "ADSK_Этаж",
            Self::RoomNames => "DPM_AR_Отделка.Имена",
            Self::RoomNumbers => "DPM_AR_Отделка.Номера",
        }
    }
}

/// Report text written onto rooms by aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReportField {
    FloorComposition,
    FloorArea,
    CeilingComposition,
    CeilingArea,
    CeilingHeight,
    WallComposition,
    WallArea,
    ColumnComposition,
    ColumnArea,
    SkirtComposition,
    SkirtLength,
}

impl ReportField {
    pub const ALL: [Self; 11] = [
        Self::FloorComposition,
        Self::FloorArea,
        Self::CeilingComposition,
        Self::CeilingArea,
        Self::CeilingHeight,
        Self::WallComposition,
        Self::WallArea,
        Self::ColumnComposition,
        Self::ColumnArea,
        Self::SkirtComposition,
        Self::SkirtLength,
    ];

    /// Shared parameter name in the host document.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::FloorComposition => "DPM_AR_Отделка.Полы",
            Self::FloorArea => "DPM_AR_Отделка.Полы.Площадь",
            Self::CeilingComposition => "DPM_AR_Отделка.Потолки",
            Self::CeilingArea => "DPM_AR_Отделка.Потолки.Площадь",
            Self::CeilingHeight => "DPM_AR_Отделка.Потолки.Высота",
            Self::WallComposition => "DPM_AR_Отделка.Стены",
            Self::WallArea => "DPM_AR_Отделка.Стены.Площадь",
            Self::ColumnComposition => "DPM_AR_Отделка.Колонны",
            Self::ColumnArea => "DPM_AR_Отделка.Колонны.Площадь",
            Self::SkirtComposition => "DPM_AR_Отделка.Плинтусы",
            Self::SkirtLength => "DPM_AR_Отделка.Плинтусы.Длина",
        }
    }
}

/// Which parameter names are bound to which categories in a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterBindings {
    bound: BTreeSet<(Category, &'static str)>,
}

impl ParameterBindings {
    pub fn bind(&mut self, category: Category, name: &'static str) {
        self.bound.insert((category, name));
    }

    #[must_use]
    pub fn is_bound(&self, category: Category, name: &'static str) -> bool {
        self.bound.contains(&(category, name))
    }

    /// Bindings covering every field of [`ParameterSchema::standard`].
    #[must_use]
    pub fn complete() -> Self {
        let mut bindings = Self::default();
        for (category, name) in ParameterSchema::standard().required() {
            bindings.bind(*category, name);
        }
        bindings
    }
}

/// The set of bindings a run depends on.
#[derive(Debug, Clone)]
pub struct ParameterSchema {
    required: Vec<(Category, &'static str)>,
}

impl ParameterSchema {
    /// Metadata fields on every finish category plus all report fields on rooms.
    #[must_use]
    pub fn standard() -> Self {
        let mut required = Vec::new();
        for category in Category::FINISHES {
            for field in MetadataField::ALL {
                required.push((category, field.name()));
            }
        }
        for field in ReportField::ALL {
            required.push((Category::Rooms, field.name()));
        }
        Self { required }
    }

    #[must_use]
    pub fn required(&self) -> &[(Category, &'static str)] {
        &self.required
    }

    /// Required bindings absent from `bindings`, in schema order.
    #[must_use]
    pub fn missing(&self, bindings: &ParameterBindings) -> Vec<(Category, &'static str)> {
        self.required
            .iter()
            .copied()
            .filter(|(c, n)| !bindings.is_bound(*c, n))
            .collect()
    }

    /// Fails on the first required binding that is absent.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::MissingParameterBinding`.
    pub fn validate(&self, bindings: &ParameterBindings) -> Result<()> {
        match self.missing(bindings).first() {
            Some((category, parameter)) => Err(DocumentError::MissingParameterBinding {
                parameter,
                category: category.label(),
            }
            .into()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn complete_bindings_validate() {
        let schema = ParameterSchema::standard();
        assert!(schema.validate(&ParameterBindings::complete()).is_ok());
        assert_eq!(schema.required().len(), 3 * 5 + 11);
    }

    #[test]
    fn missing_binding_fails_fast() {
        let schema = ParameterSchema::standard();
        let err = schema.validate(&ParameterBindings::default()).unwrap_err();
        assert!(err.to_string().contains("DPM_AR_Отделка.Имя"));
    }

    #[test]
    fn missing_lists_only_absent() {
        let schema = ParameterSchema::standard();
        let mut bindings = ParameterBindings::default();
        for (c, n) in schema.required() {
            if !(*c == Category::Rooms && *n == ReportField::SkirtLength.name()) {
                bindings.bind(*c, n);
            }
        }
        assert_ne!(bindings, ParameterBindings::complete());
        assert_eq!(
            schema.missing(&bindings),
            vec![(Category::Rooms, ReportField::SkirtLength.name())]
        );
    }
}
