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

mod get;
mod post;
pub mod server;
mod state;
mod template;

#[cfg(test)]
mod tests {
    use std::fs::write;

    use portpicker::pick_unused_port;
    use reqwest::StatusCode;
    use tempfile::TempDir;
    use tempfile::tempdir;
    use tokio::spawn;

    use cardinal_core::error::ErrorKind;
    use cardinal_core::error::Fallible;
    use cardinal_core::rotation::DEFAULT_REFRESH_THRESHOLD;
    use cardinal_core::types::timestamp::Timestamp;

    use crate::cmd::review::server::ReviewMode;
    use crate::cmd::review::server::ServerConfig;
    use crate::cmd::review::server::start_server;
    use crate::utils::wait_for_server;

    const TEST_HOST: &str = "127.0.0.1";

    const ONE_CARD: &str = "\
# Ownership
## Question
Who owns a value?
## Answer
Exactly one binding.
";

    const TWO_CARDS: &str = "\
# Alpha
## Question
First question?
## Answer
First answer.

# Beta
## Question
Second question?
## Answer
Second answer.
";

    fn config(path: &str, port: u16, mode: ReviewMode) -> ServerConfig {
        ServerConfig {
            path: Some(path.to_string()),
            host: TEST_HOST.to_string(),
            port,
            session_started_at: Timestamp::now(),
            mode,
            refresh_threshold: DEFAULT_REFRESH_THRESHOLD,
            category_filter: None,
            shuffle: false,
        }
    }

    fn write_deck(content: &str) -> Fallible<(TempDir, String)> {
        let dir = tempdir()?;
        write(dir.path().join("cards.md"), content)?;
        let path = dir.path().display().to_string();
        Ok((dir, path))
    }

    async fn get_page(port: u16) -> String {
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/"))
            .await
            .unwrap();
        assert!(response.status().is_success());
        response.text().await.unwrap()
    }

    async fn post_action(port: u16, action: &str) -> String {
        let response = reqwest::Client::new()
            .post(format!("http://{TEST_HOST}:{port}/"))
            .form(&[("action", action)])
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
        response.text().await.unwrap()
    }

    #[tokio::test]
    async fn test_start_server_on_non_existent_path() {
        let port = pick_unused_port().unwrap();
        let result = start_server(config("./derpherp", port, ReviewMode::Rotation)).await;
        let err = result.err().unwrap();
        assert!(err.to_string().contains("no such file or directory"));
    }

    #[tokio::test]
    async fn test_start_server_with_no_cards() -> Fallible<()> {
        let port = pick_unused_port().unwrap();
        let dir = tempdir()?;
        let path = dir.path().display().to_string();
        start_server(config(&path, port, ReviewMode::Rotation)).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_category_rejected() -> Fallible<()> {
        let port = pick_unused_port().unwrap();
        let (_dir, path) = write_deck(ONE_CARD)?;
        let mut config = config(&path, port, ReviewMode::Rotation);
        config.category_filter = Some("Nope".to_string());
        let err = start_server(config).await.err().unwrap();
        assert!(err.to_string().contains("unknown category"));
        Ok(())
    }

    #[tokio::test]
    async fn test_e2e_rotation() -> Fallible<()> {
        let port = pick_unused_port().unwrap();
        let (_dir, path) = write_deck(ONE_CARD)?;
        spawn(async move { start_server(config(&path, port, ReviewMode::Rotation)).await });
        wait_for_server(TEST_HOST, port).await?;

        // Hit the `style.css` endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/style.css"))
            .await
            .unwrap();
        assert!(response.status().is_success());
        assert_eq!(response.headers().get("content-type").unwrap(), "text/css");

        // Hit the `script.js` endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/script.js"))
            .await
            .unwrap();
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/javascript"
        );

        // Hit the not found endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/herp-derp"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Hit the root endpoint: the front is shown, the back is not.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/"))
            .await
            .unwrap();
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
        let html = response.text().await.unwrap();
        assert!(html.contains("Ownership"));
        assert!(html.contains("Who owns a value?"));
        assert!(!html.contains("Exactly one binding."));
        assert!(html.contains("0 cards remaining"));

        // Hit reveal.
        let html = post_action(port, "Reveal").await;
        assert!(html.contains("Exactly one binding."));

        // Hit 'Incorrect': the single card cycles back around, unrevealed.
        let html = post_action(port, "Incorrect").await;
        assert!(html.contains("Who owns a value?"));
        assert!(!html.contains("Exactly one binding."));
        assert!(html.contains("0 incorrectly answered"));

        // Hit end.
        let html = post_action(port, "End").await;
        assert!(html.contains("Session Completed"));

        Ok(())
    }

    #[tokio::test]
    async fn test_rotation_counts_across_a_round() -> Fallible<()> {
        let port = pick_unused_port().unwrap();
        let (_dir, path) = write_deck(TWO_CARDS)?;
        spawn(async move { start_server(config(&path, port, ReviewMode::Rotation)).await });
        wait_for_server(TEST_HOST, port).await?;

        let html = get_page(port).await;
        assert!(html.contains("1 cards remaining"));
        assert!(html.contains("0 correctly answered"));

        post_action(port, "Reveal").await;
        let html = post_action(port, "Correct").await;
        assert!(html.contains("0 cards remaining"));
        assert!(html.contains("1 correctly answered"));

        // Answering the last pending card folds the round back together.
        post_action(port, "Reveal").await;
        let html = post_action(port, "Correct").await;
        assert!(html.contains("1 cards remaining"));
        assert!(html.contains("0 correctly answered"));

        Ok(())
    }

    #[tokio::test]
    async fn test_e2e_easiness() -> Fallible<()> {
        let port = pick_unused_port().unwrap();
        let deck = format!("---\neasiness = 2.0\n---\n{ONE_CARD}");
        let (_dir, path) = write_deck(&deck)?;
        spawn(async move { start_server(config(&path, port, ReviewMode::Easiness)).await });
        wait_for_server(TEST_HOST, port).await?;

        let html = get_page(port).await;
        assert!(html.contains("card 1 of 1"));
        assert!(html.contains("easiness 2.00"));

        // Rate the card down.
        post_action(port, "Reveal").await;
        let html = post_action(port, "Rate-1").await;
        assert!(html.contains("easiness 1.70"));

        // An out-of-range rating is rejected without a state change.
        let html = post_action(port, "Rate-9").await;
        assert!(html.contains("easiness 1.70"));

        // Navigation wraps on a single-card deck.
        let html = post_action(port, "Next").await;
        assert!(html.contains("card 1 of 1"));

        Ok(())
    }

    #[tokio::test]
    async fn test_shutdown_after_end_completes_cleanly() -> Fallible<()> {
        let port = pick_unused_port().unwrap();
        let (_dir, path) = write_deck(ONE_CARD)?;
        let handle =
            spawn(async move { start_server(config(&path, port, ReviewMode::Rotation)).await });
        wait_for_server(TEST_HOST, port).await?;

        post_action(port, "End").await;
        // The server may drop the connection mid-shutdown.
        let _ = reqwest::Client::new()
            .post(format!("http://{TEST_HOST}:{port}/"))
            .form(&[("action", "Shutdown")])
            .send()
            .await;
        let result = handle.await.unwrap();
        assert!(result.is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn test_shutdown_without_end_is_interrupted() -> Fallible<()> {
        let port = pick_unused_port().unwrap();
        let (_dir, path) = write_deck(ONE_CARD)?;
        let handle =
            spawn(async move { start_server(config(&path, port, ReviewMode::Rotation)).await });
        wait_for_server(TEST_HOST, port).await?;

        let _ = reqwest::Client::new()
            .post(format!("http://{TEST_HOST}:{port}/"))
            .form(&[("action", "Shutdown")])
            .send()
            .await;
        let result = handle.await.unwrap();
        assert_eq!(result.err().unwrap().kind(), &ErrorKind::Interrupted);
        Ok(())
    }
}
