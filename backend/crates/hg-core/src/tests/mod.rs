mod audit_action;
