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

#[cfg(test)]
pub mod tests {
    use oxygen_cdn_proxy::config::Config;
    use std::fs::write;
    use tempfile::TempDir;

    fn temp_config(dir: &TempDir, filename: &str, yaml: &str) -> String {
        let path = dir.path().join(filename);
        write(&path, yaml).unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_load_valid_config_from_file() {
        let dir = TempDir::new().unwrap();
        let yaml = r#"
app_id: storefront
proxy_port: 8080
proxy_prefix: "/assets-proxy/"
"#;
        let path = temp_config(&dir, "valid.yaml", yaml);
        let config = Config::from_file(&path).expect("should parse valid config");

        assert_eq!(config.app_id, "storefront");
        assert_eq!(config.proxy_port, 8080);
        assert_eq!(config.proxy_prefix, "/assets-proxy/");
    }

    #[test]
    fn test_defaults_are_applied() {
        let dir = TempDir::new().unwrap();
        let path = temp_config(&dir, "minimal.yaml", "app_id: storefront\n");
        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.proxy_port, 3000);
        assert_eq!(config.proxy_prefix, "/.cdn/");
    }

    #[test]
    fn test_prefix_without_slashes_fails() {
        let dir = TempDir::new().unwrap();
        for (i, prefix) in [".cdn", "/.cdn", ".cdn/", "//", "/"].iter().enumerate() {
            let yaml = format!("app_id: storefront\nproxy_prefix: \"{prefix}\"\n");
            let path = temp_config(&dir, &format!("prefix_{i}.yaml"), &yaml);
            assert!(
                Config::from_file(&path).is_err(),
                "Expected '{prefix}' to be rejected"
            );
        }
    }

    #[test]
    fn test_prefix_with_route_pattern_fails() {
        let config = Config {
            proxy_prefix: "/:shop/".into(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            proxy_prefix: "/*cdn/".into(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_app_id_fails() {
        let config = Config {
            app_id: "  ".into(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_missing_app_id_fails() {
        let dir = TempDir::new().unwrap();
        let path = temp_config(&dir, "no_app.yaml", "proxy_port: 3000\n");
        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_nonexistent_file_fails() {
        let result = Config::from_file("nonexistent.yaml");
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_yaml_fails() {
        let dir = TempDir::new().unwrap();
        let path = temp_config(&dir, "bad.yaml", "app_id: test\n  - invalid_yaml");
        assert!(Config::from_file(&path).is_err());
    }
}
