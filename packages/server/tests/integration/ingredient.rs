use crate::common::{TestApp, routes};

#[tokio::test]
async fn list_is_ordered_by_name() {
    let app = TestApp::spawn().await;
    app.create_ingredient("salt", "g").await;
    app.create_ingredient("flour", "g").await;

    let res = app.get_without_token(routes::INGREDIENTS).await;

    assert_eq!(res.status, 200);
    let names: Vec<&str> = res
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["flour", "salt"]);
}

#[tokio::test]
async fn name_filter_matches_prefix_case_insensitively() {
    let app = TestApp::spawn().await;
    app.create_ingredient("Sugar", "g").await;
    app.create_ingredient("salt", "g").await;
    app.create_ingredient("flour", "g").await;

    let res = app
        .get_without_token(&format!("{}?name=s", routes::INGREDIENTS))
        .await;

    assert_eq!(res.status, 200);
    let mut names: Vec<&str> = res
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    names.sort_unstable();
    assert_eq!(names, vec!["Sugar", "salt"]);
}

#[tokio::test]
async fn single_ingredient_can_be_fetched() {
    let app = TestApp::spawn().await;
    let id = app.create_ingredient("flour", "g").await;

    let res = app.get_without_token(&routes::ingredient(id)).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["name"], "flour");
    assert_eq!(res.body["measurement_unit"], "g");
}

#[tokio::test]
async fn unknown_ingredient_is_not_found() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(&routes::ingredient(9999)).await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}
