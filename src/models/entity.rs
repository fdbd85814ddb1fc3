//! Descriptores de entidades
//!
//! Cada entidad del sistema (conductor, vehículo, cliente, carga, ruta y
//! mantenimiento) se describe con una tabla, una columna clave y una lista
//! ordenada de campos con su regla de validación. El controlador genérico de
//! formularios trabaja sólo con estos descriptores.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::database::query_builder::SqlValue;
use crate::utils::validation;

/// Tipo de entidad; el slug se usa en las rutas de la API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Driver,
    Vehicle,
    Client,
    Cargo,
    Route,
    Maintenance,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Driver,
        EntityKind::Vehicle,
        EntityKind::Client,
        EntityKind::Cargo,
        EntityKind::Route,
        EntityKind::Maintenance,
    ];

    pub fn descriptor(self) -> &'static EntityDescriptor {
        match self {
            EntityKind::Driver => &DRIVER,
            EntityKind::Vehicle => &VEHICLE,
            EntityKind::Client => &CLIENT,
            EntityKind::Cargo => &CARGO,
            EntityKind::Route => &ROUTE,
            EntityKind::Maintenance => &MAINTENANCE,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            EntityKind::Driver => "driver",
            EntityKind::Vehicle => "vehicle",
            EntityKind::Client => "client",
            EntityKind::Cargo => "cargo",
            EntityKind::Route => "route",
            EntityKind::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Regla de validación de un campo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    Name,
    Text { max: usize },
    LicenseNumber,
    Salary,
    Plate,
    Year,
    Odometer,
    TaxId,
    Date,
    PositiveNumber,
    /// Clave foránea hacia otra entidad
    Reference(EntityKind),
}

impl FieldRule {
    /// Validar el texto ya recortado y convertirlo al valor tipado
    ///
    /// `None` significa que el campo no cumple la regla.
    pub fn parse(self, raw: &str) -> Option<SqlValue> {
        let text = || SqlValue::Text(raw.to_string());

        match self {
            FieldRule::Name => validation::valid_name(raw).then(text),
            FieldRule::Text { max } => validation::valid_text(raw, max).then(text),
            FieldRule::LicenseNumber => validation::valid_license_number(raw).then(text),
            FieldRule::Plate => validation::valid_plate(raw).then(text),
            FieldRule::TaxId => validation::valid_tax_id(raw).then(text),
            FieldRule::Salary => validation::valid_salary(raw)
                .then(|| validation::parse_decimal(raw).map(SqlValue::Decimal))
                .flatten(),
            FieldRule::PositiveNumber => validation::valid_positive_number(raw)
                .then(|| validation::parse_decimal(raw).map(SqlValue::Decimal))
                .flatten(),
            FieldRule::Year => validation::valid_year(raw)
                .then(|| validation::parse_integer(raw).map(SqlValue::Integer))
                .flatten(),
            FieldRule::Odometer => validation::valid_odometer(raw)
                .then(|| validation::parse_integer(raw).map(SqlValue::Integer))
                .flatten(),
            FieldRule::Date => validation::parse_date_ymd(raw).map(SqlValue::Date),
            FieldRule::Reference(_) => validation::parse_integer(raw).map(SqlValue::Integer),
        }
    }

    pub fn reference(self) -> Option<EntityKind> {
        match self {
            FieldRule::Reference(kind) => Some(kind),
            _ => None,
        }
    }
}

/// Campo de formulario: nombre de columna, etiqueta y mensajes
#[derive(Debug)]
pub struct FieldSpec {
    pub column: &'static str,
    pub label: &'static str,
    pub rule: FieldRule,
    /// Mensaje cuando el valor no cumple la regla
    pub invalid_message: &'static str,
    /// Mensaje cuando la referencia no existe (sólo claves foráneas)
    pub missing_message: &'static str,
}

impl FieldSpec {
    const fn new(column: &'static str, label: &'static str, rule: FieldRule, invalid_message: &'static str) -> Self {
        Self {
            column,
            label,
            rule,
            invalid_message,
            missing_message: "",
        }
    }

    const fn reference(
        column: &'static str,
        label: &'static str,
        target: EntityKind,
        invalid_message: &'static str,
        missing_message: &'static str,
    ) -> Self {
        Self {
            column,
            label,
            rule: FieldRule::Reference(target),
            invalid_message,
            missing_message,
        }
    }
}

/// Mensajes de estado para las operaciones que terminan bien
#[derive(Debug)]
pub struct OutcomeMessages {
    pub created: &'static str,
    pub updated: &'static str,
    pub deleted: &'static str,
}

#[derive(Debug)]
pub struct EntityDescriptor {
    pub kind: EntityKind,
    pub table: &'static str,
    pub key_column: &'static str,
    pub label: &'static str,
    pub fields: &'static [FieldSpec],
    pub messages: OutcomeMessages,
}

impl EntityDescriptor {
    /// Columnas del listado: la clave seguida de los campos declarados
    pub fn list_columns(&self) -> Vec<&'static str> {
        std::iter::once(self.key_column)
            .chain(self.fields.iter().map(|f| f.column))
            .collect()
    }

    pub fn references(&self) -> impl Iterator<Item = (&'static FieldSpec, EntityKind)> {
        self.fields
            .iter()
            .filter_map(|f| f.rule.reference().map(|target| (f, target)))
    }
}

pub static DRIVER: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Driver,
    table: "driver",
    key_column: "id",
    label: "Conductor",
    fields: &[
        FieldSpec::new("name", "Nombre", FieldRule::Name, "Nombre inválido (2-100 caracteres)."),
        FieldSpec::new(
            "license_number",
            "Licencia",
            FieldRule::LicenseNumber,
            "Licencia inválida (11 dígitos).",
        ),
        FieldSpec::new("salary", "Salario", FieldRule::Salary, "Salario inválido."),
    ],
    messages: OutcomeMessages {
        created: "Conductor registrado exitosamente.",
        updated: "Conductor actualizado.",
        deleted: "Conductor eliminado exitosamente.",
    },
};

pub static VEHICLE: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Vehicle,
    table: "vehicle",
    key_column: "id",
    label: "Vehículo",
    fields: &[
        FieldSpec::new("plate", "Matrícula", FieldRule::Plate, "Matrícula inválida (ej: ABC1234)."),
        FieldSpec::new("model", "Modelo", FieldRule::Text { max: 100 }, "Modelo inválido."),
        FieldSpec::new("year", "Año", FieldRule::Year, "Año inválido."),
        FieldSpec::new("odometer_km", "Kilometraje", FieldRule::Odometer, "Kilometraje inválido."),
    ],
    messages: OutcomeMessages {
        created: "Vehículo registrado.",
        updated: "Vehículo actualizado.",
        deleted: "Vehículo eliminado.",
    },
};

pub static CLIENT: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Client,
    table: "client",
    key_column: "id",
    label: "Cliente",
    fields: &[
        FieldSpec::new("name", "Nombre", FieldRule::Name, "Nombre inválido."),
        FieldSpec::new("tax_id", "Identificación fiscal", FieldRule::TaxId, "Identificación fiscal inválida."),
        FieldSpec::new("address", "Dirección", FieldRule::Text { max: 200 }, "Dirección inválida."),
    ],
    messages: OutcomeMessages {
        created: "Cliente registrado.",
        updated: "Cliente actualizado.",
        deleted: "Cliente eliminado.",
    },
};

pub static CARGO: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Cargo,
    table: "cargo",
    key_column: "id",
    label: "Carga",
    fields: &[
        FieldSpec::new("description", "Descripción", FieldRule::Text { max: 200 }, "Descripción inválida."),
        FieldSpec::new("weight", "Peso (kg)", FieldRule::PositiveNumber, "Peso inválido."),
        FieldSpec::new("value", "Valor", FieldRule::PositiveNumber, "Valor inválido."),
        FieldSpec::reference(
            "client_id",
            "ID Cliente",
            EntityKind::Client,
            "ID de cliente inválido.",
            "Cliente no encontrado.",
        ),
        FieldSpec::reference(
            "route_id",
            "ID Ruta",
            EntityKind::Route,
            "ID de ruta inválido.",
            "Ruta no encontrada.",
        ),
    ],
    messages: OutcomeMessages {
        created: "Carga registrada.",
        updated: "Carga actualizada.",
        deleted: "Carga eliminada.",
    },
};

pub static ROUTE: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Route,
    table: "route",
    key_column: "id",
    label: "Ruta",
    fields: &[
        FieldSpec::new("origin", "Origen", FieldRule::Text { max: 100 }, "Origen inválido."),
        FieldSpec::new("destination", "Destino", FieldRule::Text { max: 100 }, "Destino inválido."),
        FieldSpec::new("distance_km", "Distancia (km)", FieldRule::PositiveNumber, "Distancia inválida."),
        FieldSpec::reference(
            "driver_id",
            "ID Conductor",
            EntityKind::Driver,
            "ID de conductor inválido.",
            "Conductor no encontrado.",
        ),
        FieldSpec::reference(
            "vehicle_id",
            "ID Vehículo",
            EntityKind::Vehicle,
            "ID de vehículo inválido.",
            "Vehículo no encontrado.",
        ),
    ],
    messages: OutcomeMessages {
        created: "Ruta registrada.",
        updated: "Ruta actualizada.",
        deleted: "Ruta eliminada.",
    },
};

pub static MAINTENANCE: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Maintenance,
    table: "maintenance",
    key_column: "id",
    label: "Mantenimiento",
    fields: &[
        FieldSpec::reference(
            "vehicle_id",
            "ID Vehículo",
            EntityKind::Vehicle,
            "ID de vehículo inválido.",
            "Vehículo no encontrado.",
        ),
        FieldSpec::new("date", "Fecha (AAAA-MM-DD)", FieldRule::Date, "Fecha inválida."),
        FieldSpec::new("cost", "Costo", FieldRule::PositiveNumber, "Costo inválido."),
        FieldSpec::new("description", "Descripción", FieldRule::Text { max: 300 }, "Descripción inválida."),
    ],
    messages: OutcomeMessages {
        created: "Mantenimiento registrado.",
        updated: "Mantenimiento actualizado.",
        deleted: "Mantenimiento eliminado.",
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_maps_to_its_descriptor() {
        for kind in EntityKind::ALL {
            let descriptor = kind.descriptor();
            assert_eq!(descriptor.kind, kind);
            assert_eq!(descriptor.table, kind.slug());
            assert_eq!(descriptor.list_columns()[0], "id");
        }
    }

    #[test]
    fn test_reference_fields_have_missing_messages() {
        for kind in EntityKind::ALL {
            for (field, target) in kind.descriptor().references() {
                assert!(!field.missing_message.is_empty(), "{}.{}", kind, field.column);
                assert_ne!(target, kind);
            }
        }
    }

    #[test]
    fn test_declared_field_order() {
        let columns: Vec<_> = CARGO.fields.iter().map(|f| f.column).collect();
        assert_eq!(columns, ["description", "weight", "value", "client_id", "route_id"]);
        let columns: Vec<_> = MAINTENANCE.fields.iter().map(|f| f.column).collect();
        assert_eq!(columns, ["vehicle_id", "date", "cost", "description"]);
    }

    #[test]
    fn test_field_rule_parse_produces_typed_values() {
        assert_eq!(FieldRule::Year.parse("2020"), Some(SqlValue::Integer(2020)));
        assert_eq!(FieldRule::Reference(EntityKind::Client).parse("abc"), None);
        assert_eq!(
            FieldRule::Plate.parse("abc1234"),
            Some(SqlValue::Text("abc1234".to_string()))
        );
        assert!(matches!(FieldRule::Date.parse("2024-02-29"), Some(SqlValue::Date(_))));
        assert_eq!(FieldRule::Date.parse("2023-02-29"), None);
        assert!(matches!(FieldRule::Salary.parse("2500.75"), Some(SqlValue::Decimal(_))));
    }

    #[test]
    fn test_entity_kind_serde_slug() {
        let kind: EntityKind = serde_json::from_str("\"maintenance\"").unwrap();
        assert_eq!(kind, EntityKind::Maintenance);
        assert_eq!(serde_json::to_string(&EntityKind::Cargo).unwrap(), "\"cargo\"");
    }
}
