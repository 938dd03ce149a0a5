mod signed_tokens;
