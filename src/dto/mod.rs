pub mod payment_dto;
pub mod test_dto;
