//! Replay protection integration tests.

#[cfg(test)]
mod tests {
    use httpmac_auth::RejectReason;
    use httpmac_core::{MacAuthConfig, ReplayCheckOrder};

    use crate::{signed_parts, test_credential, test_validator};

    #[tokio::test]
    async fn test_should_reject_resubmitted_request() {
        let credential = test_credential();
        let (validator, _) = test_validator([credential.clone()], MacAuthConfig::default());

        let parts = signed_parts(&credential, "GET", "/protected_resource", Some("rnd00001"));
        assert!(validator.validate_parts(&parts).await.unwrap().is_accepted());

        let replay = validator.validate_parts(&parts).await.unwrap();
        let rejection = replay.rejection().unwrap();
        assert_eq!(rejection.reason(), &RejectReason::DuplicateNonce);
        assert_eq!(rejection.challenge(), "MAC error=\"Duplicate nonce\"");
    }

    #[tokio::test]
    async fn test_should_accept_same_request_with_new_nonce() {
        let credential = test_credential();
        let (validator, _) = test_validator([credential.clone()], MacAuthConfig::default());

        for nonce in ["rnd00001", "rnd00002", "rnd00003"] {
            let parts = signed_parts(&credential, "GET", "/protected_resource", Some(nonce));
            assert!(
                validator.validate_parts(&parts).await.unwrap().is_accepted(),
                "nonce {nonce} should be accepted"
            );
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_should_accept_exactly_one_of_concurrent_replays() {
        for order in [
            ReplayCheckOrder::BeforeSignature,
            ReplayCheckOrder::AfterSignature,
        ] {
            let credential = test_credential();
            let config = MacAuthConfig {
                replay_check: order,
                ..MacAuthConfig::default()
            };
            let (validator, _) = test_validator([credential.clone()], config);
            let parts = signed_parts(&credential, "GET", "/protected_resource", Some("rnd00001"));

            let attempts: Vec<_> = (0..16)
                .map(|_| {
                    let validator = validator.clone();
                    let parts = parts.clone();
                    tokio::spawn(async move { validator.validate_parts(&parts).await })
                })
                .collect();

            let verdicts: Vec<_> = futures::future::join_all(attempts)
                .await
                .into_iter()
                .map(|joined| joined.unwrap().unwrap())
                .collect();

            let accepted = verdicts.iter().filter(|v| v.is_accepted()).count();
            let replays = verdicts
                .iter()
                .filter_map(|v| v.rejection())
                .filter(|r| r.reason() == &RejectReason::DuplicateNonce)
                .count();
            assert_eq!(accepted, 1, "order {order:?}");
            assert_eq!(replays, 15, "order {order:?}");
        }
    }
}
