//! DynamoDB error mapping.
//!
//! Store-level failures are propagated, not interpreted: every SDK error
//! surfaces as [`AccessError::StoreUnavailable`] carrying the failed
//! operation and the service's own description. Retrying is the caller's
//! decision.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::scan::ScanError;

use idstore_core::access::AccessError;

/// Map a GetItem SDK error to AccessError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
) -> AccessError {
    match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => {
            AccessError::StoreUnavailable("Table not found".to_string())
        }
        GetItemError::ProvisionedThroughputExceededException(_) => {
            AccessError::StoreUnavailable("Throughput exceeded, please retry".to_string())
        }
        GetItemError::RequestLimitExceeded(_) => {
            AccessError::StoreUnavailable("Request limit exceeded, please retry".to_string())
        }
        GetItemError::InternalServerError(_) => {
            AccessError::StoreUnavailable("DynamoDB internal server error".to_string())
        }
        err => AccessError::StoreUnavailable(format!("GetItem failed: {err:?}")),
    }
}

/// Map a PutItem SDK error to AccessError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
) -> AccessError {
    match err.into_service_error() {
        PutItemError::ResourceNotFoundException(_) => {
            AccessError::StoreUnavailable("Table not found".to_string())
        }
        PutItemError::ProvisionedThroughputExceededException(_) => {
            AccessError::StoreUnavailable("Throughput exceeded, please retry".to_string())
        }
        PutItemError::RequestLimitExceeded(_) => {
            AccessError::StoreUnavailable("Request limit exceeded, please retry".to_string())
        }
        PutItemError::TransactionConflictException(_) => {
            AccessError::StoreUnavailable("Transaction conflict, please retry".to_string())
        }
        PutItemError::InternalServerError(_) => {
            AccessError::StoreUnavailable("DynamoDB internal server error".to_string())
        }
        err => AccessError::StoreUnavailable(format!("PutItem failed: {err:?}")),
    }
}

/// Map a Scan SDK error to AccessError.
pub fn map_scan_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<ScanError, R>,
) -> AccessError {
    match err.into_service_error() {
        ScanError::ResourceNotFoundException(_) => {
            AccessError::StoreUnavailable("Table not found".to_string())
        }
        ScanError::ProvisionedThroughputExceededException(_) => {
            AccessError::StoreUnavailable("Throughput exceeded, please retry".to_string())
        }
        ScanError::RequestLimitExceeded(_) => {
            AccessError::StoreUnavailable("Request limit exceeded, please retry".to_string())
        }
        ScanError::InternalServerError(_) => {
            AccessError::StoreUnavailable("DynamoDB internal server error".to_string())
        }
        err => AccessError::StoreUnavailable(format!("Scan failed: {err:?}")),
    }
}
