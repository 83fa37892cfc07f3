// Copyright 2025 Fernando Borretti
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

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::sleep;

use cardinal_core::error::Fallible;

// max-age is one week in seconds.
pub const CACHE_CONTROL_IMMUTABLE: &str = "public, max-age=604800, immutable";

pub async fn wait_for_server(host: &str, port: u16) -> Fallible<()> {
    loop {
        if let Ok(stream) = TcpStream::connect(format!("{host}:{port}")).await {
            drop(stream);
            break;
        }
        sleep(Duration::from_millis(1)).await;
    }
    Ok(())
}

pub fn expand_tilde<T: AsRef<Path>>(path: T) -> PathBuf {
    let path = path.as_ref();
    if let Ok(p) = path.strip_prefix("~/") {
        if let Some(home) = home_dir() {
            return home.join(p);
        }
    }
    path.to_path_buf()
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(unix)]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde_leaves_plain_paths_alone() {
        assert_eq!(expand_tilde("/tmp/cards"), PathBuf::from("/tmp/cards"));
        assert_eq!(expand_tilde("relative/cards"), PathBuf::from("relative/cards"));
    }

    #[cfg(unix)]
    #[test]
    fn test_expand_tilde_joins_home() {
        // HOME is set in any environment the test suite runs in.
        if let Ok(home) = std::env::var("HOME") {
            assert_eq!(expand_tilde("~/cards"), PathBuf::from(home).join("cards"));
        }
    }
}
