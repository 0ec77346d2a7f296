//! Tests for the supporting aggregates: clients, products, categories and
//! installed equipment.

mod common;

use assert_matches::assert_matches;
use chrono::{Duration, Local};
use common::TestContext;
use medequip_api::{
    entities::client::ClientStatus,
    entities::equipment::{EquipmentCategory, EquipmentStatus},
    errors::ServiceError,
    services::categories::{CreateCategoryRequest, UpdateCategoryRequest},
    services::clients::{ClientFilter, UpdateClientRequest},
    services::equipment::{CreateEquipmentRequest, EquipmentFilter, UpdateEquipmentRequest},
    services::products::{CreateProductRequest, ProductFilter, UpdateProductRequest},
    services::quotes::{CreateQuoteRequest, LineItemInput},
};
use rust_decimal_macros::dec;
use uuid::Uuid;

fn product_request(code: &str) -> CreateProductRequest {
    CreateProductRequest {
        code: code.to_string(),
        item: Some("Electrodos desechables".to_string()),
        service_line: Some("Monitoreo".to_string()),
        specialty: None,
        classification: None,
        description: None,
        usage_notes: None,
        includes: None,
        package_quantity: Some(4),
        currency: None,
        cost: Some(dec!(60)),
        unit_cost: None,
        expiry_date: None,
        warehouse_location: None,
        storage_conditions: None,
        supplier: Some("MedSupply".to_string()),
        tax_percent: None,
        factory_price: None,
        landed_factor: None,
        margin_factor: None,
        currency_factor: None,
        sales_commission_percent: None,
        package_price: Some(dec!(100)),
        unit_price: None,
    }
}

fn equipment_request(client_id: Uuid, serial: &str) -> CreateEquipmentRequest {
    CreateEquipmentRequest {
        client_id,
        name: "Ventilador".to_string(),
        model: "V60".to_string(),
        serial_number: serial.to_string(),
        category: EquipmentCategory::Ventilation,
        brand: "Respironics".to_string(),
        location: "UCI piso 3".to_string(),
        install_date: None,
        purchase_date: None,
        warranty_expiry: None,
        last_maintenance: None,
        maintenance_interval_months: None,
        status: None,
        specifications: None,
        notes: None,
        supplier: None,
        cost: None,
        currency: None,
    }
}

// ==================== Clients ====================

#[tokio::test]
async fn client_emails_are_unique() {
    let ctx = TestContext::new().await;
    ctx.seed_client("Hospital A", "dup@example.mx").await;

    let err = ctx
        .services
        .clients
        .create_client(medequip_api::services::clients::CreateClientRequest {
            name: "Hospital B".to_string(),
            contact: "Dr. B".to_string(),
            email: "dup@example.mx".to_string(),
            phone: "5557654321".to_string(),
            street: None,
            city: None,
            state: None,
            postal_code: None,
            country: None,
            rfc: None,
            client_type: medequip_api::entities::client::ClientType::Clinic,
            status: None,
            notes: None,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));
}

#[tokio::test]
async fn client_full_address_derives_from_parts() {
    let ctx = TestContext::new().await;
    let client = ctx.seed_client("Hospital C", "addr@example.mx").await;
    let address = client.full_address.expect("derived address");
    assert!(address.contains("Av. Reforma 123"));
    assert!(address.contains("CDMX"));
    assert!(address.contains("México"));
}

#[tokio::test]
async fn client_listing_searches_and_filters() {
    let ctx = TestContext::new().await;
    ctx.seed_client("Hospital Ángeles", "ha@example.mx").await;
    let other = ctx.seed_client("Laboratorio Azteca", "la@example.mx").await;

    ctx.services
        .clients
        .update_client(
            other.id,
            UpdateClientRequest {
                status: Some(ClientStatus::Inactive),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let by_search = ctx
        .services
        .clients
        .list_clients(ClientFilter {
            search: Some("Ángeles".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_search.total, 1);

    let by_status = ctx
        .services
        .clients
        .list_clients(ClientFilter {
            status: Some(ClientStatus::Inactive),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_status.total, 1);
    assert_eq!(by_status.clients[0].id, other.id);

    let stats = ctx.services.clients.client_stats().await.unwrap();
    assert_eq!(stats.total_clients, 2);
    assert_eq!(stats.active_clients, 1);
    assert_eq!(stats.inactive_clients, 1);
}

#[tokio::test]
async fn clients_with_quotes_cannot_be_deleted() {
    let ctx = TestContext::new().await;
    let client = ctx.seed_client("Hospital D", "del@example.mx").await;

    ctx.services
        .quotes
        .create_quote(CreateQuoteRequest {
            client_id: Some(client.id),
            client_name: None,
            client_contact: None,
            email: "del@example.mx".to_string(),
            phone: None,
            address: None,
            position: None,
            line_items: vec![LineItemInput {
                quantity: Some(1),
                unit_price: Some(dec!(10)),
                ..Default::default()
            }],
            terms: None,
            currency: None,
            tax_rate: None,
        })
        .await
        .unwrap();

    let err = ctx
        .services
        .clients
        .delete_client(client.id)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));

    // Still there
    assert!(ctx
        .services
        .clients
        .get_client(client.id)
        .await
        .unwrap()
        .is_some());
}

// ==================== Products ====================

#[tokio::test]
async fn product_codes_are_uppercased_and_unique() {
    let ctx = TestContext::new().await;

    let product = ctx
        .services
        .products
        .create_product(product_request("  ekg-200 "))
        .await
        .unwrap();
    assert_eq!(product.code, "EKG-200");
    // Unit values derive from package values over the package quantity
    assert_eq!(product.unit_price, Some(dec!(25.00)));
    assert_eq!(product.unit_cost, Some(dec!(15.00)));

    let err = ctx
        .services
        .products
        .create_product(product_request("EKG-200"))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));

    let found = ctx
        .services
        .products
        .get_product_by_code("ekg-200")
        .await
        .unwrap();
    assert!(found.is_some());
}

#[tokio::test]
async fn product_search_spans_catalog_fields() {
    let ctx = TestContext::new().await;
    ctx.services
        .products
        .create_product(product_request("MON-1"))
        .await
        .unwrap();
    let mut other = product_request("LAB-9");
    other.item = Some("Centrífuga de laboratorio".to_string());
    other.service_line = Some("Laboratorio".to_string());
    ctx.services.products.create_product(other).await.unwrap();

    let hits = ctx
        .services
        .products
        .list_products(ProductFilter {
            search: Some("Centrífuga".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(hits.total, 1);
    assert_eq!(hits.products[0].code, "LAB-9");

    let by_line = ctx
        .services
        .products
        .list_products(ProductFilter {
            service_line: Some("Monitoreo".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_line.total, 1);
}

#[tokio::test]
async fn product_stats_report_expiry_outlook() {
    let ctx = TestContext::new().await;
    let today = Local::now().date_naive();

    let mut expired = product_request("EXP-1");
    expired.expiry_date = Some(today - Duration::days(10));
    let mut near = product_request("EXP-2");
    near.expiry_date = Some(today + Duration::days(5));
    let mut fine = product_request("EXP-3");
    fine.expiry_date = Some(today + Duration::days(365));

    for req in [expired, near, fine] {
        ctx.services.products.create_product(req).await.unwrap();
    }

    let stats = ctx.services.products.product_stats().await.unwrap();
    assert_eq!(stats.total_products, 3);
    assert_eq!(stats.expired, 1);
    assert_eq!(stats.near_expiry, 1);
}

#[tokio::test]
async fn product_update_rederives_unit_price() {
    let ctx = TestContext::new().await;
    let product = ctx
        .services
        .products
        .create_product(product_request("UPD-1"))
        .await
        .unwrap();

    let updated = ctx
        .services
        .products
        .update_product(
            product.id,
            UpdateProductRequest {
                package_price: Some(dec!(200)),
                unit_price: None,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.unit_price, Some(dec!(50.00)));
}

// ==================== Categories ====================

#[tokio::test]
async fn category_slugs_generate_and_follow_renames() {
    let ctx = TestContext::new().await;

    let category = ctx
        .services
        .categories
        .create_category(CreateCategoryRequest {
            name: "Monitoreo de Pacientes".to_string(),
            description: "Monitores y accesorios".to_string(),
            parent_category_id: None,
            is_active: None,
            sort_order: None,
        })
        .await
        .unwrap();
    assert_eq!(category.slug, "monitoreo-de-pacientes");

    let renamed = ctx
        .services
        .categories
        .update_category(
            category.id,
            UpdateCategoryRequest {
                name: Some("Monitoreo Avanzado".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.slug, "monitoreo-avanzado");

    let err = ctx
        .services
        .categories
        .create_category(CreateCategoryRequest {
            name: "Monitoreo Avanzado".to_string(),
            description: "duplicado".to_string(),
            parent_category_id: None,
            is_active: None,
            sort_order: None,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));
}

#[tokio::test]
async fn categories_with_children_cannot_be_deleted() {
    let ctx = TestContext::new().await;

    let parent = ctx
        .services
        .categories
        .create_category(CreateCategoryRequest {
            name: "Imagenología".to_string(),
            description: "Equipos de imagen".to_string(),
            parent_category_id: None,
            is_active: None,
            sort_order: Some(1),
        })
        .await
        .unwrap();
    let child = ctx
        .services
        .categories
        .create_category(CreateCategoryRequest {
            name: "Rayos X".to_string(),
            description: "Radiografía convencional".to_string(),
            parent_category_id: Some(parent.id),
            is_active: None,
            sort_order: Some(2),
        })
        .await
        .unwrap();

    let err = ctx
        .services
        .categories
        .delete_category(parent.id)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));

    ctx.services
        .categories
        .delete_category(child.id)
        .await
        .unwrap();
    ctx.services
        .categories
        .delete_category(parent.id)
        .await
        .unwrap();
}

// ==================== Equipment ====================

#[tokio::test]
async fn equipment_requires_existing_client_and_unique_serial() {
    let ctx = TestContext::new().await;

    let err = ctx
        .services
        .equipment
        .create_equipment(equipment_request(Uuid::new_v4(), "sn-100"))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));

    let client = ctx.seed_client("Hospital E", "eq@example.mx").await;
    let device = ctx
        .services
        .equipment
        .create_equipment(equipment_request(client.id, " sn-100 "))
        .await
        .unwrap();
    assert_eq!(device.serial_number, "SN-100");
    assert_eq!(device.status, EquipmentStatus::Active);
    assert_eq!(device.maintenance_interval_months, 12);

    let err = ctx
        .services
        .equipment
        .create_equipment(equipment_request(client.id, "SN-100"))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));
}

#[tokio::test]
async fn equipment_lists_per_client_with_filters() {
    let ctx = TestContext::new().await;
    let client = ctx.seed_client("Hospital F", "eqf@example.mx").await;
    let other = ctx.seed_client("Hospital G", "eqg@example.mx").await;

    ctx.services
        .equipment
        .create_equipment(equipment_request(client.id, "SN-1"))
        .await
        .unwrap();
    let mut monitor = equipment_request(client.id, "SN-2");
    monitor.category = EquipmentCategory::Monitoring;
    ctx.services.equipment.create_equipment(monitor).await.unwrap();
    ctx.services
        .equipment
        .create_equipment(equipment_request(other.id, "SN-3"))
        .await
        .unwrap();

    let all = ctx
        .services
        .equipment
        .list_equipment_for_client(client.id, EquipmentFilter::default())
        .await
        .unwrap();
    assert_eq!(all.total, 2);

    let monitors = ctx
        .services
        .equipment
        .list_equipment_for_client(
            client.id,
            EquipmentFilter {
                category: Some(EquipmentCategory::Monitoring),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(monitors.total, 1);
    assert_eq!(monitors.equipment[0].serial_number, "SN-2");
}

#[tokio::test]
async fn maintenance_alerts_surface_overdue_devices_first() {
    let ctx = TestContext::new().await;
    let client = ctx.seed_client("Hospital H", "eqh@example.mx").await;
    let today = Local::now().date_naive();

    // Overdue: serviced 14 months ago on a 12-month interval
    let mut overdue = equipment_request(client.id, "OVER-1");
    overdue.last_maintenance = Some(today - Duration::days(14 * 30));
    ctx.services.equipment.create_equipment(overdue).await.unwrap();

    // Fresh: serviced recently
    let mut fresh = equipment_request(client.id, "FRESH-1");
    fresh.last_maintenance = Some(today - Duration::days(30));
    ctx.services.equipment.create_equipment(fresh).await.unwrap();

    // Retired devices never alert
    let mut retired = equipment_request(client.id, "RET-1");
    retired.status = Some(EquipmentStatus::Retired);
    ctx.services.equipment.create_equipment(retired).await.unwrap();

    let alerts = ctx
        .services
        .equipment
        .maintenance_alerts(None)
        .await
        .unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].equipment.serial_number, "OVER-1");
    assert!(alerts[0].outlook.overdue);
}

#[tokio::test]
async fn equipment_updates_track_service_dates() {
    let ctx = TestContext::new().await;
    let client = ctx.seed_client("Hospital I", "eqi@example.mx").await;
    let device = ctx
        .services
        .equipment
        .create_equipment(equipment_request(client.id, "SVC-1"))
        .await
        .unwrap();

    let today = Local::now().date_naive();
    let updated = ctx
        .services
        .equipment
        .update_equipment(
            device.id,
            UpdateEquipmentRequest {
                last_maintenance: Some(today),
                status: Some(EquipmentStatus::Maintenance),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.last_maintenance, Some(today));
    assert_eq!(updated.status, EquipmentStatus::Maintenance);

    let err = ctx
        .services
        .equipment
        .update_equipment(
            device.id,
            UpdateEquipmentRequest {
                maintenance_interval_months: Some(0),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}
