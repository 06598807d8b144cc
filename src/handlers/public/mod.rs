// handlers/public/mod.rs - Public handlers (no Innexar JWT required)
//
// The CRM proxy routes live here too: they never decode the caller's token,
// they only require one to be present and hand it to the CRM backend.
pub mod auth;
pub mod crm;
pub mod i18n;
pub mod system;
