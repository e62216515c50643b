mod show_status;
