pub mod certification_dto;
pub mod common_dto;
pub mod driver_dto;
pub mod training_dto;
