use trace_uml_studio::normalize::{
    clean_operation_name, clean_service_name, detect_and_strip_namespace, extract_base_name,
    sanitize_identifier,
};

#[test]
fn test_grpc_operation_names() {
    assert_eq!(
        clean_operation_name("grpc.hipstershop.ProductService/GetProduct"),
        "ProductService/GetProduct"
    );
    assert_eq!(
        clean_operation_name("/hipstershop.ProductService/ListProducts"),
        "ProductService/ListProducts"
    );
    assert_eq!(
        clean_operation_name("oteldemo.CheckoutService/PlaceOrder"),
        "CheckoutService/PlaceOrder"
    );
}

#[test]
fn test_protocol_prefix_stripped_once() {
    assert_eq!(clean_operation_name("kafka.orders"), "orders");
    assert_eq!(clean_operation_name("mqtt.grpc.x"), "grpc.x");
}

#[test]
fn test_plain_names_unchanged() {
    assert_eq!(clean_operation_name("GET /api/products"), "GET /api/products");
    assert_eq!(clean_operation_name("render"), "render");
    assert_eq!(clean_operation_name(""), "");
}

#[test]
fn test_namespace_fallback_rules() {
    assert_eq!(
        detect_and_strip_namespace("com.acme.billing.invoice.create"),
        "invoice.create"
    );
    assert_eq!(
        detect_and_strip_namespace("io.opentelemetry.v1.9x.Exporter"),
        "Exporter"
    );
    assert_eq!(detect_and_strip_namespace("svc.op"), "svc.op");
}

#[test]
fn test_service_names() {
    assert_eq!(clean_service_name("  grpc.payments "), "payments");
    assert_eq!(clean_service_name(""), "");
}

#[test]
fn test_hash_suffixes() {
    assert_eq!(
        extract_base_name("recommendationservice-7d5c8f9b8-xk7pt"),
        "recommendationservice"
    );
    assert_eq!(extract_base_name("frontend-abc123def456"), "frontend");
    assert_eq!(extract_base_name("frontend-v2"), "frontend-v2");
}

#[test]
fn test_identifiers() {
    assert_eq!(sanitize_identifier("product-catalog"), "product_catalog");
    assert_eq!(sanitize_identifier("Node-10.0.0.1"), "Node_10_0_0_1");
    assert_eq!(sanitize_identifier(""), "unknown");
}
