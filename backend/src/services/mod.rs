//! Business logic services

pub mod alert;
pub mod audit;
pub mod auth;
pub mod batch;
pub mod kit;
pub mod movement;
pub mod notification;
pub mod price;
pub mod product;
pub mod project;
pub mod purchase_order;
pub mod report;
pub mod settings;
pub mod supplier;

pub use alert::AlertService;
pub use audit::AuditService;
pub use auth::AuthService;
pub use batch::BatchService;
pub use kit::KitService;
pub use movement::MovementService;
pub use notification::NotificationService;
pub use price::PriceService;
pub use product::ProductService;
pub use project::ProjectService;
pub use purchase_order::PurchaseOrderService;
pub use report::ReportService;
pub use settings::SettingsService;
pub use supplier::SupplierService;
