//! Body extractors whose rejections render as [`AppError`] bodies.

use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` with the application's error shape on rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `axum::Form` with the application's error shape on rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Form), rejection(AppError))]
pub struct AppForm<T>(pub T);
