//! Application constants.
//!
//! Wire-level codes and descriptions live here so clients relying on them
//! have a single place to look.

/// Measure constants
pub mod measure {
    /// Value stored for every freshly uploaded measure until real extraction exists
    pub const PLACEHOLDER_VALUE: i32 = 3;
}

/// Error codes returned in `error_code`
pub mod error_codes {
    pub const INVALID_DATA: &str = "INVALID_DATA";
    pub const INVALID_TYPE: &str = "INVALID_TYPE";
    pub const DOUBLE_REPORT: &str = "DOUBLE_REPORT";
    pub const MEASURE_NOT_FOUND: &str = "MEASURE_NOT_FOUND";
    pub const MEASURES_NOT_FOUND: &str = "MEASURES_NOT_FOUND";
    pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";
}

/// Descriptions returned in `error_description`
pub mod messages {
    pub const INVALID_DATA: &str = "Dados inválidos fornecidos.";
    pub const INVALID_TYPE: &str = "Tipo de medição não permitida";
    pub const DOUBLE_REPORT: &str = "Leitura do mês já realizada";
    pub const MEASURE_NOT_FOUND: &str = "Leitura não encontrada";
    pub const MEASURES_NOT_FOUND: &str = "Nenhuma leitura encontrada";
    pub const INTERNAL_SERVER_ERROR: &str = "Erro interno do servidor.";

    // Field validation
    pub const INVALID_UUID: &str = "Invalid uuid";
    pub const INVALID_DATE: &str = "Invalid date";
    pub const INVALID_IMAGE: &str = "Invalid input";
    pub const INVALID_MEASURE_TYPE: &str = "Tipo de medição inválido. Deve ser \"water\" ou \"gas\".";
    pub const NEGATIVE_CONFIRMED_VALUE: &str =
        "Valor confirmado deve ser um número inteiro positivo.";
    pub const NOT_AN_INTEGER: &str = "Expected integer, received float";
}

/// Database constants
pub mod database {
    /// Connection acquire timeout in seconds
    pub const ACQUIRE_TIMEOUT_SECS: u64 = 3;

    /// Idle connection timeout in seconds
    pub const IDLE_TIMEOUT_SECS: u64 = 300;

    /// Per-statement timeout applied on every new connection
    pub const STATEMENT_TIMEOUT: &str = "15s";
}

/// HTTP header names
pub mod headers {
    pub const REQUEST_ID: &str = "x-request-id";
}
