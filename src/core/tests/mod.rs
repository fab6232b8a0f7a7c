mod replication_tests;
