//! Tests for quote listing, filtering and aggregate statistics.

mod common;

use common::TestContext;
use medequip_api::{
    entities::quote::QuoteStatus,
    services::quotes::{CreateQuoteRequest, LineItemInput, QuoteFilter, TermsInput},
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn request(email: &str, unit_price: Decimal) -> CreateQuoteRequest {
    CreateQuoteRequest {
        client_id: None,
        client_name: Some("Hospital San José".to_string()),
        client_contact: Some("Dra. Velasco".to_string()),
        email: email.to_string(),
        phone: None,
        address: None,
        position: None,
        line_items: vec![LineItemInput {
            quantity: Some(1),
            unit_price: Some(unit_price),
            ..Default::default()
        }],
        terms: None,
        currency: None,
        tax_rate: None,
    }
}

#[tokio::test]
async fn listing_filters_by_status_and_search() {
    let ctx = TestContext::new().await;
    let quotes = &ctx.services.quotes;

    let q1 = quotes
        .create_quote(request("a@example.mx", dec!(100)))
        .await
        .unwrap();
    let _q2 = quotes
        .create_quote(request("b@example.mx", dec!(200)))
        .await
        .unwrap();
    quotes.update_status(q1.id, QuoteStatus::Sent).await.unwrap();

    let sent = quotes
        .list_quotes(QuoteFilter {
            status: Some(QuoteStatus::Sent),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(sent.total, 1);
    assert_eq!(sent.quotes[0].id, q1.id);

    let by_folio = quotes
        .list_quotes(QuoteFilter {
            search: Some(q1.folio.clone()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_folio.total, 1);

    let by_name = quotes
        .list_quotes(QuoteFilter {
            search: Some("San José".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_name.total, 2);

    let nothing = quotes
        .list_quotes(QuoteFilter {
            search: Some("no-such-quote".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(nothing.total, 0);
}

#[tokio::test]
async fn listing_paginates_newest_first() {
    let ctx = TestContext::new().await;
    let quotes = &ctx.services.quotes;

    for i in 0..5 {
        quotes
            .create_quote(request(&format!("c{}@example.mx", i), dec!(10)))
            .await
            .unwrap();
    }

    let page1 = quotes
        .list_quotes(QuoteFilter {
            page: 1,
            per_page: 2,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page1.total, 5);
    assert_eq!(page1.quotes.len(), 2);

    let page3 = quotes
        .list_quotes(QuoteFilter {
            page: 3,
            per_page: 2,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page3.quotes.len(), 1);
}

#[tokio::test]
async fn stats_track_counts_and_confirmed_value() {
    let ctx = TestContext::new().await;
    let quotes = &ctx.services.quotes;

    let q1 = quotes
        .create_quote(request("s1@example.mx", dec!(100)))
        .await
        .unwrap();
    let q2 = quotes
        .create_quote(request("s2@example.mx", dec!(200)))
        .await
        .unwrap();
    let _draft = quotes
        .create_quote(request("s3@example.mx", dec!(300)))
        .await
        .unwrap();

    for q in [&q1, &q2] {
        quotes.update_status(q.id, QuoteStatus::Sent).await.unwrap();
        quotes
            .update_status(q.id, QuoteStatus::Confirmed)
            .await
            .unwrap();
    }

    let stats = quotes.quote_stats().await.unwrap();
    assert_eq!(stats.total_quotes, 3);
    assert_eq!(stats.draft_quotes, 1);
    assert_eq!(stats.confirmed_quotes, 2);
    assert_eq!(stats.sent_quotes, 0);
    // 100 and 200 plus 16% tax each
    assert_eq!(stats.total_value, dec!(348));
    assert_eq!(stats.average_quote_value, dec!(174));
}

#[tokio::test]
async fn quotes_resolve_by_folio() {
    let ctx = TestContext::new().await;
    let quote = ctx
        .services
        .quotes
        .create_quote(request("f@example.mx", dec!(42)))
        .await
        .unwrap();

    let found = ctx
        .services
        .quotes
        .get_quote_by_folio(&quote.folio)
        .await
        .unwrap()
        .expect("quote by folio");
    assert_eq!(found.id, quote.id);

    assert!(ctx
        .services
        .quotes
        .get_quote_by_folio("BHL010100C99")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn explicit_terms_and_tax_rate_override_defaults() {
    let ctx = TestContext::new().await;

    let mut req = request("t@example.mx", dec!(100));
    req.tax_rate = Some(dec!(0.08));
    req.terms = Some(TermsInput {
        payment_conditions: Some("50% anticipo, 50% contra entrega".to_string()),
        delivery_time: None,
        warranty: None,
        observations: None,
        valid_until: None,
    });

    let quote = ctx.services.quotes.create_quote(req).await.unwrap();
    assert_eq!(quote.tax_rate, dec!(0.08));
    assert_eq!(quote.tax_amount, dec!(8));
    assert_eq!(quote.total, dec!(108));
    assert!(quote.terms_payment_conditions.starts_with("50%"));
    // Unset sub-fields still fall back to the boilerplate
    assert!(quote.terms_delivery_time.contains("15"));
}

#[tokio::test]
async fn stored_line_items_round_trip() {
    let ctx = TestContext::new().await;
    let quote = ctx
        .services
        .quotes
        .create_quote(request("r@example.mx", dec!(75.50)))
        .await
        .unwrap();

    let items = quote.items().expect("line items deserialize");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 1);
    assert_eq!(items[0].unit_price, dec!(75.50));
    assert_eq!(items[0].line_total, dec!(75.50));
}
