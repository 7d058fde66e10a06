mod supabase_auth_client;

pub use supabase_auth_client::SupabaseAuthClient;
