//! Unified error codes for the catalog server
//!
//! This module defines all error codes used across the server and frontend.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 6xxx: Catalog errors (products, options, variants, images, upload)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 6xxx: Catalog ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product slug already exists
    SlugExists = 6002,
    /// Product has invalid price
    ProductInvalidPrice = 6003,
    /// Price/stock belongs to variants once the product is configurable
    ProductHasVariants = 6004,

    /// Option not found
    OptionNotFound = 6101,
    /// Option reference is not valid for this product/variant
    InvalidOptionRef = 6102,
    /// Option value not found
    OptionValueNotFound = 6103,
    /// Option value reference is not valid for its option
    InvalidOptionValueRef = 6104,

    /// Variant not found
    VariantNotFound = 6201,
    /// A variant with the same option-value signature already exists
    DuplicateVariant = 6202,
    /// Variant signature does not cover every declared option
    IncompleteSignature = 6203,

    /// Image not found
    ImageNotFound = 6301,

    // ==================== 64xx: File Upload ====================
    /// File too large
    FileTooLarge = 6401,
    /// Unsupported file format
    UnsupportedFileFormat = 6402,
    /// Invalid image file
    InvalidImageFile = 6403,
    /// No file provided
    NoFileProvided = 6404,
    /// Empty file provided
    EmptyFile = 6405,
    /// No filename provided
    NoFilename = 6406,
    /// Image processing failed
    ImageProcessingFailed = 6407,
    /// File storage failed
    FileStorageFailed = 6408,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::SlugExists => "Product slug already exists",
            ErrorCode::ProductInvalidPrice => "Product has invalid price",
            ErrorCode::ProductHasVariants => {
                "Product price/stock is managed per variant once variants exist"
            }
            ErrorCode::OptionNotFound => "Option not found",
            ErrorCode::InvalidOptionRef => "Invalid option reference",
            ErrorCode::OptionValueNotFound => "Option value not found",
            ErrorCode::InvalidOptionValueRef => "Invalid option value reference",
            ErrorCode::VariantNotFound => "Variant not found",
            ErrorCode::DuplicateVariant => "Variant with this option combination already exists",
            ErrorCode::IncompleteSignature => "Variant must supply one value per declared option",
            ErrorCode::ImageNotFound => "Image not found",

            // File Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::NoFilename => "No filename provided",
            ErrorCode::ImageProcessingFailed => "Image processing failed",
            ErrorCode::FileStorageFailed => "File storage failed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Catalog
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::SlugExists),
            6003 => Ok(ErrorCode::ProductInvalidPrice),
            6004 => Ok(ErrorCode::ProductHasVariants),
            6101 => Ok(ErrorCode::OptionNotFound),
            6102 => Ok(ErrorCode::InvalidOptionRef),
            6103 => Ok(ErrorCode::OptionValueNotFound),
            6104 => Ok(ErrorCode::InvalidOptionValueRef),
            6201 => Ok(ErrorCode::VariantNotFound),
            6202 => Ok(ErrorCode::DuplicateVariant),
            6203 => Ok(ErrorCode::IncompleteSignature),
            6301 => Ok(ErrorCode::ImageNotFound),

            // File Upload
            6401 => Ok(ErrorCode::FileTooLarge),
            6402 => Ok(ErrorCode::UnsupportedFileFormat),
            6403 => Ok(ErrorCode::InvalidImageFile),
            6404 => Ok(ErrorCode::NoFileProvided),
            6405 => Ok(ErrorCode::EmptyFile),
            6406 => Ok(ErrorCode::NoFilename),
            6407 => Ok(ErrorCode::ImageProcessingFailed),
            6408 => Ok(ErrorCode::FileStorageFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
