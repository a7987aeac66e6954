//! Permission definitions
//!
//! Simplified RBAC: read endpoints only require a valid token, mutating
//! endpoints require the matching module permission.

/// Stock adjustment and product/variant management
pub const PERM_PRODUCTS_MANAGE: &str = "products:manage";

/// Order status changes, bulk operations, auto-cancel sweep
pub const PERM_ORDERS_MANAGE: &str = "orders:manage";

/// Super permission (admin role)
pub const PERM_ALL: &str = "all";

/// Configurable permission list
pub const ALL_PERMISSIONS: &[&str] = &[PERM_PRODUCTS_MANAGE, PERM_ORDERS_MANAGE];

/// Validate a permission string
pub fn is_valid_permission(permission: &str) -> bool {
    permission == PERM_ALL || ALL_PERMISSIONS.contains(&permission)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_permissions() {
        assert!(is_valid_permission("products:manage"));
        assert!(is_valid_permission("orders:manage"));
        assert!(is_valid_permission("all"));
        assert!(!is_valid_permission("menu:manage"));
    }
}
