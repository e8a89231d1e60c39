mod registration_dto;

pub use registration_dto::{
    CreateRegistrationDto, RegistrationListQuery, RegistrationResponseDto, UpdateRegistrationDto,
};
