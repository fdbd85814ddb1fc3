pub mod record_dto;
