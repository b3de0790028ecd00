pub mod account_permissions;
