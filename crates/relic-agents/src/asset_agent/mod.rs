// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Acts as the **[A]gent** for the asset subsystem.
//!
//! This module holds the tactical side of importing: which importer is tried
//! first, what happens when it fails, and where the produced asset ends up in
//! the catalog. The decoding itself is delegated to the `asset_lane`.

mod importer;

pub use importer::*;
