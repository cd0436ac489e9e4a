use serde_json::json;

use crate::common::{TestApp, routes};

/// Seed two recipes sharing an ingredient and put both in the user's cart.
/// Returns the auth token.
async fn cart_with_two_recipes(app: &TestApp) -> String {
    let (token, _) = app.create_authenticated_user("alice").await;
    let flour = app.create_ingredient("flour", "g").await;
    let eggs = app.create_ingredient("eggs", "pcs").await;

    let a = app
        .create_recipe(&token, "Recipe A", &[(flour, 200), (eggs, 2)])
        .await;
    let b = app
        .create_recipe(&token, "Recipe B", &[(flour, 300), (eggs, 1)])
        .await;

    for id in [a, b] {
        let res = app
            .post_with_token(&routes::shopping_cart(id), &json!({}), &token)
            .await;
        assert_eq!(res.status, 201, "add to cart failed: {}", res.text);
    }
    token
}

mod text_export {
    use super::*;

    #[tokio::test]
    async fn quantities_are_summed_across_recipes() {
        let app = TestApp::spawn().await;
        let token = cart_with_two_recipes(&app).await;

        let res = app
            .download_with_token(&routes::download(Some("txt")), &token)
            .await;

        assert_eq!(res.status, 200);
        assert!(res.content_type.starts_with("text/plain"));
        assert!(
            res.content_disposition
                .contains("attachment; filename=\"shopping_cart.txt\""),
            "unexpected disposition: {}",
            res.content_disposition
        );

        let text = String::from_utf8(res.bytes).unwrap();
        assert!(text.contains("- flour - 500 g"), "missing total in:\n{text}");
        assert!(text.contains("- eggs - 3 pcs"), "missing total in:\n{text}");
        assert!(text.contains("Total recipes in cart: 2"));
    }

    #[tokio::test]
    async fn txt_is_the_default_format() {
        let app = TestApp::spawn().await;
        let token = cart_with_two_recipes(&app).await;

        let res = app.download_with_token(&routes::download(None), &token).await;

        assert_eq!(res.status, 200);
        assert!(res.content_type.starts_with("text/plain"));
    }

    #[tokio::test]
    async fn each_recipe_section_lists_its_own_amounts() {
        let app = TestApp::spawn().await;
        let token = cart_with_two_recipes(&app).await;

        let res = app
            .download_with_token(&routes::download(Some("txt")), &token)
            .await;
        let text = String::from_utf8(res.bytes).unwrap();

        assert!(text.contains("Recipe: Recipe A"));
        assert!(text.contains("- flour - 200 g"));
        assert!(text.contains("Recipe: Recipe B"));
        assert!(text.contains("- flour - 300 g"));
    }
}

mod pdf_export {
    use super::*;

    #[tokio::test]
    async fn pdf_export_produces_a_pdf_attachment() {
        let app = TestApp::spawn().await;
        let token = cart_with_two_recipes(&app).await;

        let res = app
            .download_with_token(&routes::download(Some("pdf")), &token)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.content_type, "application/pdf");
        assert!(
            res.content_disposition
                .contains("attachment; filename=\"shopping_cart.pdf\""),
            "unexpected disposition: {}",
            res.content_disposition
        );
        assert!(res.bytes.starts_with(b"%PDF-"), "not a PDF payload");
    }
}

mod error_cases {
    use super::*;

    #[tokio::test]
    async fn empty_cart_cannot_be_exported() {
        let app = TestApp::spawn().await;
        let (token, _) = app.create_authenticated_user("alice").await;

        let res = app
            .get_with_token(&routes::download(Some("txt")), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "EMPTY_CART");
    }

    #[tokio::test]
    async fn unknown_file_type_is_rejected() {
        let app = TestApp::spawn().await;
        let token = cart_with_two_recipes(&app).await;

        let res = app
            .get_with_token(&routes::download(Some("docx")), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn export_requires_authentication() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::download(Some("txt"))).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }
}
