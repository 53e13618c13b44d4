//! Diesel schema for import task persistence.

diesel::table! {
    /// Import task records with lifecycle state and cached upstream data.
    import_tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Requesting user.
        owner -> Uuid,
        /// Target role.
        role_id -> Uuid,
        /// Pinned branch/tag/commit reference, if any.
        #[max_length = 255]
        pinned_ref -> Nullable<Varchar>,
        /// Requested alternate role name, if any.
        #[max_length = 255]
        alternate_role_name -> Nullable<Varchar>,
        /// Branch the run actually used, once selected.
        #[max_length = 255]
        branch -> Nullable<Varchar>,
        /// Task lifecycle state.
        #[max_length = 50]
        state -> Varchar,
        /// Repository statistics snapshot payload.
        stats -> Jsonb,
        /// Latest-commit metadata payload, when present.
        commit -> Nullable<Jsonb>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Start timestamp.
        started_at -> Nullable<Timestamptz>,
        /// Finish timestamp.
        finished_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Append-only diagnostic log entries.
    import_task_messages (id) {
        /// Append-order sequence, assigned by the database.
        id -> Int8,
        /// Owning task.
        task_id -> Uuid,
        /// Entry severity.
        #[max_length = 50]
        severity -> Varchar,
        /// Clipped entry text.
        #[max_length = 255]
        message_text -> Varchar,
        /// Append timestamp.
        recorded_at -> Timestamptz,
    }
}

diesel::joinable!(import_task_messages -> import_tasks (task_id));

diesel::allow_tables_to_appear_in_same_query!(import_tasks, import_task_messages);
