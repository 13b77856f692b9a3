// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod support;
pub mod merkle_tests;
pub mod proof_tests;
pub mod snapshot_tests;
pub mod artifact_tests;
