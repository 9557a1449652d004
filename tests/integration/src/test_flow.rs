//! Sign-then-validate integration tests.

#[cfg(test)]
mod tests {
    use httpmac_auth::{
        RequestContext, SignError, SignatureContext, SignedRequest, authorization_header,
    };
    use httpmac_core::{Credential, MacAuthConfig, MacCredential};

    use crate::{
        TEST_ID, authorization_of, request_parts, signed_parts, test_credential, test_validator,
    };

    const PINNED_MAC: &str = "6T3zZzy2Emppni6bzL7kdRxUWL4=";

    #[test]
    fn test_should_reproduce_draft_header_exactly() {
        let context = SignatureContext::builder()
            .timestamp(1_336_363_200)
            .nonce("dj83hs9s")
            .method("GET")
            .uri("/resource/1?b=1&a=2")
            .host("example.com")
            .port(80)
            .build_for_validation()
            .unwrap();

        assert_eq!(
            context.canonical_string(),
            "1336363200\ndj83hs9s\nGET\n/resource/1?b=1&a=2\nexample.com\n80\n\n"
        );

        let signed = SignedRequest::new(&test_credential(), context.clone()).unwrap();
        assert_eq!(signed.mac(), PINNED_MAC);
        assert_eq!(
            signed.header_value(),
            "MAC nonce=\"dj83hs9s\", mac=\"6T3zZzy2Emppni6bzL7kdRxUWL4=\", id=\"h480djs93hd8\", ts=\"1336363200\""
        );
        assert_eq!(
            authorization_header(TEST_ID, &context, PINNED_MAC),
            signed.header_value()
        );
    }

    #[tokio::test]
    async fn test_should_accept_signed_get_request() {
        let credential = test_credential();
        let (validator, _) = test_validator([credential.clone()], MacAuthConfig::default());

        let parts = signed_parts(&credential, "GET", "/protected_resource", None);
        let verdict = validator.validate_parts(&parts).await.unwrap();

        let caller = verdict.into_result().unwrap();
        assert_eq!(caller.identifier(), TEST_ID);
    }

    #[tokio::test]
    async fn test_should_accept_lower_case_method_signature() {
        let credential = test_credential();
        let (validator, _) = test_validator([credential.clone()], MacAuthConfig::default());

        let context = SignatureContext::builder()
            .method("post")
            .uri("/protected_resource?x=1")
            .host("example.com")
            .port(80)
            .ext("client=cli")
            .build_for_signing()
            .unwrap();
        let signed = SignedRequest::new(&credential, context).unwrap();
        let parts = request_parts("POST", "/protected_resource?x=1", Some(signed.header_value().as_str()));

        assert!(authorization_of(&parts).ends_with("ext=\"client=cli\""));
        assert!(validator.validate_parts(&parts).await.unwrap().is_accepted());
    }

    #[tokio::test]
    async fn test_should_sign_declared_port() {
        let credential = test_credential();
        let (validator, _) = test_validator([credential.clone()], MacAuthConfig::default());

        let context = SignatureContext::builder()
            .method("GET")
            .uri("/items")
            .host("api.example.com")
            .port(8443)
            .build_for_signing()
            .unwrap();
        let header = SignedRequest::new(&credential, context)
            .unwrap()
            .to_header_value()
            .unwrap();

        let (parts, ()) = http::Request::builder()
            .uri("/items")
            .header(http::header::HOST, "api.example.com:8443")
            .header(http::header::AUTHORIZATION, header)
            .body(())
            .unwrap()
            .into_parts();

        assert!(validator.validate_parts(&parts).await.unwrap().is_accepted());
    }

    #[tokio::test]
    async fn test_should_use_configured_default_port() {
        let credential = test_credential();
        let config = MacAuthConfig {
            default_port: 443,
            ..MacAuthConfig::default()
        };
        let (validator, _) = test_validator([credential.clone()], config);

        // Signed for port 80, but the server assumes 443 for a bare Host.
        let parts = signed_parts(&credential, "GET", "/protected_resource", None);
        let verdict = validator.validate_parts(&parts).await.unwrap();
        assert!(!verdict.is_accepted());
    }

    #[tokio::test]
    async fn test_should_accept_freshly_issued_credential() {
        let config = MacAuthConfig::default();
        let credential = Credential::issue(config.credential_validity()).unwrap();
        let (validator, store) = test_validator([credential.clone()], config);

        let parts = signed_parts(&credential, "GET", "/protected_resource", None);
        let request = RequestContext::from_parts(&parts, 80);

        let caller = validator.identify(&request).await.unwrap().unwrap();
        assert_eq!(caller.identifier, credential.identifier);
        assert!(store.get(credential.identifier.as_str()).unwrap().clock_offset.is_some());
    }

    #[tokio::test]
    async fn test_should_accept_every_ext_the_signer_emits() {
        let credential = test_credential();
        let (validator, _) = test_validator([credential.clone()], MacAuthConfig::default());

        for ext in ["a=1, b=2", "café", "' ;:/?"] {
            let context = SignatureContext::builder()
                .method("GET")
                .uri("/protected_resource")
                .host("example.com")
                .port(80)
                .ext(ext)
                .build_for_signing()
                .unwrap();
            let signed = SignedRequest::new(&credential, context).unwrap();
            let value = http::HeaderValue::from_bytes(signed.header_value().as_bytes()).unwrap();
            let (parts, ()) = http::Request::builder()
                .uri("/protected_resource")
                .header(http::header::HOST, "example.com")
                .header(http::header::AUTHORIZATION, value)
                .body(())
                .unwrap()
                .into_parts();

            assert!(
                validator.validate_parts(&parts).await.unwrap().is_accepted(),
                "ext {ext:?}"
            );
        }

        let refused = SignatureContext::builder()
            .method("GET")
            .uri("/protected_resource")
            .host("example.com")
            .port(80)
            .nonce("ab\"cd")
            .build_for_signing();
        assert_eq!(refused, Err(SignError::UnquotableParameter("nonce")));
    }

    #[tokio::test]
    async fn test_should_identify_nobody_without_credentials() {
        let (validator, _) = test_validator([test_credential()], MacAuthConfig::default());
        let request = RequestContext::from_parts(&request_parts("GET", "/", None), 80);

        assert!(validator.identify(&request).await.unwrap().is_none());
    }
}
