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

//! Validated names and the structured location scheme used to address assets.
//!
//! Every asset is addressed by an [`AssetLocation`] of the form
//! `[packName::]name[@path]`. The name and pack name are [`ValidatedName`]s,
//! which can only ever hold strings accepted by their [`NameValidator`].

mod location;
mod name;
mod validator;

pub use location::*;
pub use name::*;
pub use validator::*;
