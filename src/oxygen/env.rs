// Copyright (C) 2025 Matías Salinas (support@fenden.com)
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

use hyper::HeaderMap;

pub const SHOP_ID_HEADER: &str = "oxygen-buyer-shop-id";
pub const STOREFRONT_ID_HEADER: &str = "oxygen-buyer-storefront-id";
pub const DEPLOYMENT_ID_HEADER: &str = "oxygen-buyer-deployment-id";

/// Geo and network details the hosting platform attaches to every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuyerDetails {
    pub ip: Option<String>,
    pub country: Option<String>,
    pub continent: Option<String>,
    pub city: Option<String>,
    pub is_eu_country: bool,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub region: Option<String>,
    pub region_code: Option<String>,
    pub timezone: Option<String>,
}

/// Request context supplied by Oxygen through `oxygen-buyer-*` headers.
///
/// None of the values are validated. Only a missing header leaves the
/// corresponding field as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OxygenEnv {
    pub buyer: BuyerDetails,
    pub shop_id: Option<String>,
    pub storefront_id: Option<String>,
    pub deployment_id: Option<String>,
}

impl OxygenEnv {
    /// Reads the platform headers out of `headers`. Never fails.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            buyer: BuyerDetails {
                ip: header_value(headers, "oxygen-buyer-ip"),
                country: header_value(headers, "oxygen-buyer-country"),
                continent: header_value(headers, "oxygen-buyer-continent"),
                city: header_value(headers, "oxygen-buyer-city"),
                is_eu_country: header_value(headers, "oxygen-buyer-is-eu-country")
                    .is_some_and(|v| !v.is_empty()),
                latitude: header_value(headers, "oxygen-buyer-latitude"),
                longitude: header_value(headers, "oxygen-buyer-longitude"),
                region: header_value(headers, "oxygen-buyer-region"),
                region_code: header_value(headers, "oxygen-buyer-region-code"),
                timezone: header_value(headers, "oxygen-buyer-timezone"),
            },
            shop_id: header_value(headers, SHOP_ID_HEADER),
            storefront_id: header_value(headers, STOREFRONT_ID_HEADER),
            deployment_id: header_value(headers, DEPLOYMENT_ID_HEADER),
        }
    }

    /// True when the request comes from the local development server.
    pub fn is_local(&self) -> bool {
        self.deployment_id.as_deref() == Some("local")
    }
}

// Values are decoded as UTF-8; invalid sequences become U+FFFD instead of
// dropping the header.
fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}
