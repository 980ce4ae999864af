//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/gyms/{gym_id}/transactions', use [format_endpoint].

/// The route for listing a gym's transactions, newest first.
pub const GYM_TRANSACTIONS: &str = "/api/gyms/{gym_id}/transactions";
/// The route for recording a payment.
pub const TRANSACTIONS_API: &str = "/api/transactions";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/gyms/{gym_id}', '{gym_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |end| param_start + end + 1);

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
