pub mod supabase;

pub use supabase::{AuthSession, DbResult, SupabaseClient};
