pub use gradebook_models::{LoginRequest, LoginResponse, RegisterRequestDto, User};
