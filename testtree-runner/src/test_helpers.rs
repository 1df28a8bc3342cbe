// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::name::ParsedName;

pub(crate) fn parse_all(names: &[&str]) -> Vec<ParsedName> {
    names
        .iter()
        .map(|name| ParsedName::parse(name).expect("name is well-formed"))
        .collect()
}
