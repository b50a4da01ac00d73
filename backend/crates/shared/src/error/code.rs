//! Error Codes - Machine-readable rejection identifiers
//!
//! Every structured rejection carries one of these codes in the `code`
//! field of the problem-details body. Front-ends branch on the code, never
//! on the human message.

/// Missing or malformed input (schema, path, or value format)
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
/// Double-submit CSRF token missing or mismatched
pub const CSRF_INVALID: &str = "CSRF_INVALID";
/// No authenticated trust claim on the request
pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
/// Authenticated, but the role does not allow the operation
pub const FORBIDDEN: &str = "FORBIDDEN";
/// National ID and phone belong to two different records
pub const MISMATCHED_CREDENTIALS: &str = "MISMATCHED_CREDENTIALS";
/// National ID is known, phone is not
pub const WRONG_PHONE_FOR_ID: &str = "WRONG_PHONE_FOR_ID";
/// Phone is known, national ID is not
pub const WRONG_ID_FOR_PHONE: &str = "WRONG_ID_FOR_PHONE";
/// Store rejected an insert on a unique fingerprint
pub const DUPLICATE_CREDENTIAL: &str = "DUPLICATE_CREDENTIAL";
/// Request conflicts with the current state of the resource
pub const CONFLICT: &str = "CONFLICT";
/// Target resource does not exist
pub const NOT_FOUND: &str = "NOT_FOUND";
/// Stored ciphertext could not be decrypted
pub const DECRYPTION_ERROR: &str = "DECRYPTION_ERROR";
/// Unexpected failure
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
/// Store temporarily unreachable or exhausted
pub const SERVICE_UNAVAILABLE: &str = "SERVICE_UNAVAILABLE";
/// Counter value outside `0..=999_999`
pub const VALUE_OUT_OF_RANGE: &str = "VALUE_OUT_OF_RANGE";
/// Admin tried to delete their own identity
pub const SELF_DELETE_FORBIDDEN: &str = "SELF_DELETE_FORBIDDEN";
/// Target identity is an admin and cannot be deleted
pub const ADMIN_DELETE_FORBIDDEN: &str = "ADMIN_DELETE_FORBIDDEN";
/// Admin tried to change their own role
pub const SELF_ROLE_CHANGE_FORBIDDEN: &str = "SELF_ROLE_CHANGE_FORBIDDEN";
/// Demotion would leave no admin
pub const LAST_ADMIN_FORBIDDEN: &str = "LAST_ADMIN_FORBIDDEN";
/// Name shorter than the minimum
pub const NAME_TOO_SHORT: &str = "NAME_TOO_SHORT";
/// Name longer than the maximum
pub const NAME_TOO_LONG: &str = "NAME_TOO_LONG";
/// Name contains characters other than letters and spaces
pub const NAME_INVALID_CHARSET: &str = "NAME_INVALID_CHARSET";
/// Name was already completed
pub const NAME_ALREADY_SET: &str = "NAME_ALREADY_SET";
